// Copyright (c) Microsoft. All rights reserved.

#[cfg(test)]
mod broker_api_http;
