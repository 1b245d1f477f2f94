// Copyright (c) Microsoft. All rights reserved.

use broker_config::CredentialsConfigDisk;
use openssl::{pkey::PKey, x509::X509};

use crate::{Credentials, Error, Issuer as IssuerTrait};

/// Serves client TLS material read from PEM files.
///
/// Files are read and validated once in [`Issuer::load`]; every instance
/// receives the same credentials afterwards.
pub struct Issuer {
    credentials: Credentials,
}

impl Issuer {
    pub async fn load(config: &CredentialsConfigDisk) -> Result<Self, Error> {
        let ca = read_pem(&config.ca_path).await?;
        let cert = read_pem(&config.cert_path).await?;
        let key = read_pem(&config.key_path).await?;

        validate(config, &ca, &cert, &key)?;
        log::info!(
            "Loaded client credentials from {} for {}",
            config.cert_path,
            config.base_url
        );

        Ok(Issuer {
            credentials: Credentials {
                base_url: config.base_url.clone(),
                ca,
                cert,
                key,
            },
        })
    }
}

#[async_trait::async_trait]
impl IssuerTrait for Issuer {
    async fn issue(&self, instance_id: &str) -> Result<Credentials, Error> {
        log::debug!("Issuing credentials for instance {}", instance_id);

        Ok(self.credentials.clone())
    }
}

async fn read_pem(path: &str) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::FileRead(path.to_string(), err))
}

fn validate(config: &CredentialsConfigDisk, ca: &str, cert: &str, key: &str) -> Result<(), Error> {
    let ca = X509::from_pem(ca.as_bytes())
        .map_err(|err| Error::InvalidCertificate(config.ca_path.clone(), err))?;
    let cert = X509::from_pem(cert.as_bytes())
        .map_err(|err| Error::InvalidCertificate(config.cert_path.clone(), err))?;
    let key = PKey::private_key_from_pem(key.as_bytes())
        .map_err(|err| Error::InvalidPrivateKey(config.key_path.clone(), err))?;

    if !cert.public_key()?.public_eq(&key) {
        return Err(Error::KeyMismatch());
    }

    let ca_key = ca.public_key()?;
    if !cert.verify(&ca_key)? {
        return Err(Error::UntrustedCertificate());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use matches::assert_matches;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::test_material;

    fn init() -> (TempDir, CredentialsConfigDisk, test_material::Material) {
        let dir = tempdir().unwrap();
        let material = test_material::generate();
        let config = test_material::write(dir.path(), &material);

        (dir, config, material)
    }

    #[tokio::test]
    async fn load_happy_path() {
        let (_dir, config, material) = init();

        let issuer = Issuer::load(&config).await.unwrap();
        let credentials = issuer.issue("i1").await.unwrap();

        assert_eq!(credentials.base_url, test_material::BASE_URL);
        assert_eq!(credentials.ca, material.ca);
        assert_eq!(credentials.cert, material.cert);
        assert_eq!(credentials.key, material.key);

        assert_eq!(issuer.issue("i2").await.unwrap(), credentials);
    }

    #[tokio::test]
    async fn load_missing_file() {
        let (_dir, mut config, _material) = init();
        config.ca_path = "/does/not/exist.pem".to_string();

        let error = Issuer::load(&config).await.err().unwrap();
        let source = std::error::Error::source(&error)
            .and_then(|source| source.downcast_ref::<std::io::Error>())
            .map(std::io::Error::kind);
        assert_eq!(source, Some(std::io::ErrorKind::NotFound));
        assert_matches!(error, Error::FileRead(path, _) if path == "/does/not/exist.pem");
    }

    #[tokio::test]
    async fn load_garbage_certificate() {
        let (_dir, config, _material) = init();
        std::fs::write(&config.cert_path, "not a certificate").unwrap();

        let error = Issuer::load(&config).await.err().unwrap();
        assert_matches!(error, Error::InvalidCertificate(path, _) if path == config.cert_path);
    }

    #[tokio::test]
    async fn load_garbage_key() {
        let (_dir, config, _material) = init();
        std::fs::write(&config.key_path, "not a key").unwrap();

        let error = Issuer::load(&config).await.err().unwrap();
        assert_matches!(error, Error::InvalidPrivateKey(_, _));
    }

    #[tokio::test]
    async fn load_key_mismatch() {
        let (_dir, config, _material) = init();
        let other_key = test_material::new_key().private_key_to_pem_pkcs8().unwrap();
        std::fs::write(&config.key_path, other_key).unwrap();

        let error = Issuer::load(&config).await.err().unwrap();
        assert_matches!(error, Error::KeyMismatch());
    }

    #[tokio::test]
    async fn load_untrusted_certificate() {
        let (_dir, config, _material) = init();
        let other = test_material::generate();
        std::fs::write(&config.ca_path, other.ca).unwrap();

        let error = Issuer::load(&config).await.err().unwrap();
        assert_matches!(error, Error::UntrustedCertificate());
    }
}
