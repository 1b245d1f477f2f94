// Copyright (c) Microsoft. All rights reserved.

//! Throwaway PKI for tests: a self-signed CA and a client certificate it signs.

use std::path::Path;

use broker_config::CredentialsConfigDisk;
use openssl::{
    asn1::Asn1Time,
    bn::BigNum,
    ec::{EcGroup, EcKey},
    hash::MessageDigest,
    nid::Nid,
    pkey::{PKey, Private},
    x509::{X509NameBuilder, X509},
};

pub const BASE_URL: &str = "https://backend.test.svc.cluster.local";

pub struct Material {
    pub ca: String,
    pub cert: String,
    pub key: String,
}

#[must_use]
pub fn generate() -> Material {
    let ca_key = new_key();
    let ca = new_cert("ca.test", 1, &ca_key, None);

    let client_key = new_key();
    let client = new_cert("client.test", 2, &client_key, Some((&ca, &ca_key)));

    Material {
        ca: pem_string(ca.to_pem().expect("encode CA")),
        cert: pem_string(client.to_pem().expect("encode client certificate")),
        key: pem_string(
            client_key
                .private_key_to_pem_pkcs8()
                .expect("encode client key"),
        ),
    }
}

/// Writes `material` as `ca.pem`, `client.pem` and `client.key` under `dir`.
#[must_use]
pub fn write(dir: &Path, material: &Material) -> CredentialsConfigDisk {
    let path = |name: &str| dir.join(name).to_string_lossy().to_string();

    let config = CredentialsConfigDisk {
        base_url: BASE_URL.to_string(),
        ca_path: path("ca.pem"),
        cert_path: path("client.pem"),
        key_path: path("client.key"),
    };

    std::fs::write(&config.ca_path, &material.ca).expect("write CA");
    std::fs::write(&config.cert_path, &material.cert).expect("write client certificate");
    std::fs::write(&config.key_path, &material.key).expect("write client key");

    config
}

#[must_use]
pub fn new_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("P-256 group");
    let key = EcKey::generate(&group).expect("generate EC key");

    PKey::from_ec_key(key).expect("wrap EC key")
}

fn new_cert(
    common_name: &str,
    serial: u32,
    key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
) -> X509 {
    let mut name = X509NameBuilder::new().expect("name builder");
    name.append_entry_by_nid(Nid::COMMONNAME, common_name)
        .expect("common name");
    let name = name.build();

    let mut builder = X509::builder().expect("certificate builder");
    builder.set_version(2).expect("version");
    let serial = BigNum::from_u32(serial)
        .and_then(|serial| serial.to_asn1_integer())
        .expect("serial");
    builder.set_serial_number(&serial).expect("serial number");
    builder.set_subject_name(&name).expect("subject");
    let not_before = Asn1Time::days_from_now(0).expect("not before");
    builder.set_not_before(&not_before).expect("not before");
    let not_after = Asn1Time::days_from_now(1).expect("not after");
    builder.set_not_after(&not_after).expect("not after");
    builder.set_pubkey(key).expect("public key");

    match issuer {
        Some((ca, ca_key)) => {
            builder
                .set_issuer_name(ca.subject_name())
                .expect("issuer");
            builder
                .sign(ca_key, MessageDigest::sha256())
                .expect("sign with CA");
        }
        None => {
            builder.set_issuer_name(&name).expect("issuer");
            builder
                .sign(key, MessageDigest::sha256())
                .expect("self sign");
        }
    }

    builder.build()
}

fn pem_string(pem: Vec<u8>) -> String {
    String::from_utf8(pem).expect("PEM is ASCII")
}
