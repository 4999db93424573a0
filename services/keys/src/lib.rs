// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Key vault key cryptography
//!
//! This crate performs cryptographic operations with key vault keys:
//! - encrypt and decrypt
//! - sign and verify, on a digest or on raw data
//! - wrap and unwrap a symmetric key
//!
//! [`CryptographyClient`] runs an operation in process when it holds RSA key
//! material that permits it, and forwards it to the key vault service
//! otherwise. Results carry the key id and algorithm either way.
//!
//! # Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use keyvault_crypto_core::{Context, OsEnv};
//! use keyvault_crypto_http_send_reqwest::ReqwestHttpSend;
//! use keyvault_crypto_keys::{
//!     Config, CryptographyClient, EncryptParameters, EncryptionAlgorithm, EnvCredentialProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!     let config = Config::default().from_env(&ctx);
//!
//!     let client = CryptographyClient::new(
//!         "https://myvault.vault.azure.net/keys/my-key",
//!         ctx,
//!         EnvCredentialProvider,
//!         config,
//!     )?;
//!
//!     let encrypted = client
//!         .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep256, b"hello".to_vec()))
//!         .await?;
//!     println!("encrypted with {} by {}", encrypted.algorithm, encrypted.key_id);
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod base64url;
mod constants;
mod pipeline;
mod provider;
mod wire;

mod algorithm;
pub use algorithm::{EncryptionAlgorithm, HashAlgorithm, KeyWrapAlgorithm, SignatureAlgorithm};

mod config;
pub use config::{scope_from_url, Config};

mod key;
pub use key::{JsonWebKey, KeyOperation, KeyProperties, KeyType, KeyVaultKey, KeyVaultKeyIdentifier};

mod models;
pub use models::*;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::CryptographyClient;

mod key_client;
pub use key_client::KeyClient;
