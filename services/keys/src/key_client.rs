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

use std::sync::Arc;

use keyvault_crypto_core::{AccessToken, Context, Error, ProvideCredential, Result};
use log::debug;

use crate::client::new_pipeline;
use crate::config::Config;
use crate::constants::KEYS_COLLECTION;
use crate::key::{KeyVaultKey, KeyVaultKeyIdentifier};
use crate::pipeline::{self, Pipeline};
use crate::CryptographyClient;

/// KeyClient reads keys from a vault and hands out [`CryptographyClient`]s
/// that share its pipeline and cached token.
#[derive(Debug, Clone)]
pub struct KeyClient {
    vault_url: String,
    pipeline: Arc<Pipeline>,
    force_remote: bool,
}

impl KeyClient {
    /// Create a client for the vault at `vault_url`, such as
    /// `https://myvault.vault.azure.net`.
    pub fn new(
        vault_url: &str,
        ctx: Context,
        credential: impl ProvideCredential<Credential = AccessToken>,
        config: Config,
    ) -> Result<Self> {
        let vault_url = vault_url.trim_end_matches('/');
        // Validate the vault url with a placeholder key so the scope and
        // key ids derived from it are well formed.
        let pipeline = new_pipeline(
            &format!("{vault_url}/{KEYS_COLLECTION}/_"),
            ctx,
            credential,
            &config,
        )?;

        Ok(Self {
            vault_url: vault_url.to_string(),
            pipeline,
            force_remote: config.force_remote,
        })
    }

    /// The vault url.
    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    /// Get a key, the latest version when `version` is `None`.
    ///
    /// Needs the `keys/get` permission.
    pub async fn get_key(&self, name: &str, version: Option<&str>) -> Result<KeyVaultKey> {
        if name.is_empty() {
            return Err(Error::validation("key name can not be empty"));
        }

        debug!("getting key {name} from {}", self.vault_url);
        let url = self.pipeline.key_url(&self.vault_url, name, version);
        self.pipeline.get_json(&url).await
    }

    /// Create a [`CryptographyClient`] for a key of this vault.
    ///
    /// Nothing is fetched until the first operation.
    pub fn get_cryptography_client(&self, name: &str, version: Option<&str>) -> Result<CryptographyClient> {
        if name.is_empty() {
            return Err(Error::validation("key name can not be empty"));
        }

        // Name and version are percent-encoded like in `get_key`, so both
        // address the same key.
        let key_id = pipeline::key_id(&self.vault_url, name, version);
        let parsed = KeyVaultKeyIdentifier::parse(&key_id)?;
        let version = version.filter(|v| !v.is_empty()).map(pipeline::encode_segment);
        if parsed.name != pipeline::encode_segment(name) || parsed.version != version {
            return Err(Error::validation(format!("invalid key name or version for {key_id}")));
        }

        Ok(CryptographyClient::with_pipeline(
            &key_id,
            self.pipeline.clone(),
            self.force_remote,
        ))
    }
}
