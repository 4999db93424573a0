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

use std::io::Read;
use std::sync::Arc;

use keyvault_crypto_core::{AccessToken, Context, Error, ErrorKind, ProvideCredential, Result};
use log::{debug, warn};
use tokio::sync::OnceCell;

use crate::algorithm::{KeyWrapAlgorithm, SignatureAlgorithm};
use crate::config::Config;
use crate::key::{JsonWebKey, KeyOperation, KeyVaultKey, KeyVaultKeyIdentifier};
use crate::models::*;
use crate::pipeline::Pipeline;
use crate::provider::{Provider, RemoteCryptographyClient};

/// CryptographyClient performs cryptographic operations with a single key.
///
/// Operations run locally when the client holds RSA key material that
/// permits them, and on the key vault service otherwise. Results look the
/// same either way.
///
/// When created from a key identifier only, the key material is fetched on
/// first use. A service error on that fetch, typically a missing `get`
/// permission, leaves the client remote only.
#[derive(Debug)]
pub struct CryptographyClient {
    key_id: String,
    local: OnceCell<Provider>,
    remote: Provider,
    force_remote: bool,
}

impl CryptographyClient {
    /// Create a client for the key identified by `key_id`, such as
    /// `https://myvault.vault.azure.net/keys/my-key/{version}`.
    pub fn new(
        key_id: &str,
        ctx: Context,
        credential: impl ProvideCredential<Credential = AccessToken>,
        config: Config,
    ) -> Result<Self> {
        let pipeline = new_pipeline(key_id, ctx, credential, &config)?;
        Ok(Self::with_pipeline(key_id, pipeline, config.force_remote))
    }

    /// Create a client from a key that was already fetched.
    ///
    /// A key without identifier has no remote path, and can't be combined
    /// with `force_remote`. Material that can't be used locally leaves the
    /// client remote only.
    pub fn from_key(
        key: KeyVaultKey,
        ctx: Context,
        credential: impl ProvideCredential<Credential = AccessToken>,
        config: Config,
    ) -> Result<Self> {
        if key.id().is_empty() {
            if config.force_remote {
                return Err(Error::config_invalid("force_remote requires a key identifier"));
            }
            return Ok(Self {
                key_id: String::new(),
                local: OnceCell::new_with(Some(Provider::local(&key.key)?)),
                remote: Provider::None,
                force_remote: false,
            });
        }

        let pipeline = new_pipeline(key.id(), ctx, credential, &config)?;
        let local = Provider::local(&key.key).unwrap_or_else(|err| {
            warn!("key material for {} can't be used locally: {err}", key.id());
            Provider::None
        });
        Ok(Self {
            key_id: key.id().to_string(),
            local: OnceCell::new_with(Some(local)),
            remote: Provider::Remote(RemoteCryptographyClient::new(key.id(), pipeline)),
            force_remote: config.force_remote,
        })
    }

    /// Create a client that only ever uses `key` locally.
    ///
    /// Operations the local provider can't run fail instead of being
    /// forwarded.
    pub fn local(key: JsonWebKey) -> Result<Self> {
        Ok(Self {
            key_id: key.id.clone(),
            local: OnceCell::new_with(Some(Provider::local(&key)?)),
            remote: Provider::None,
            force_remote: false,
        })
    }

    pub(crate) fn with_pipeline(key_id: &str, pipeline: Arc<Pipeline>, force_remote: bool) -> Self {
        Self {
            key_id: key_id.to_string(),
            local: OnceCell::new(),
            remote: Provider::Remote(RemoteCryptographyClient::new(key_id, pipeline)),
            force_remote,
        }
    }

    /// The identifier of the key this client uses.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn local_provider(&self) -> Result<&Provider> {
        let remote = &self.remote;
        self.local
            .get_or_try_init(move || async move {
                let Provider::Remote(remote) = remote else {
                    return Ok(Provider::None);
                };
                debug!("fetching key material for {}", remote.key_id());
                match remote.get_key().await {
                    Ok(key) => Ok(Provider::local(&key.key).unwrap_or_else(|err| {
                        warn!("key material for {} can't be used locally: {err}", remote.key_id());
                        Provider::None
                    })),
                    Err(err) if err.kind() == ErrorKind::Service => {
                        warn!(
                            "key material for {} is not available, using the service for all operations: {err}",
                            remote.key_id()
                        );
                        Ok(Provider::None)
                    }
                    Err(err) => Err(err),
                }
            })
            .await
    }

    /// The local provider when it should run `op`.
    async fn local_for(&self, op: KeyOperation) -> Result<Option<&Provider>> {
        if self.force_remote {
            return Ok(None);
        }
        let local = self.local_provider().await?;
        Ok(local.supports_operation(&op).then_some(local))
    }

    fn remote_for(&self, op: KeyOperation) -> Result<&Provider> {
        if self.remote.can_remote() {
            Ok(&self.remote)
        } else {
            Err(Error::validation(format!(
                "operation {} is not supported by key {}",
                op.as_str(),
                self.key_id
            )))
        }
    }

    fn falls_back(&self, err: &Error) -> bool {
        err.kind() == ErrorKind::UnsupportedAlgorithm && self.remote.can_remote()
    }

    /// Encrypt `params.plaintext`.
    ///
    /// Only RSA algorithms run locally. Keep the returned `algorithm` and
    /// `key_id` with the ciphertext.
    pub async fn encrypt(&self, params: EncryptParameters) -> Result<EncryptResult> {
        if let Some(local) = self.local_for(KeyOperation::Encrypt).await? {
            match local.encrypt(&params).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::Encrypt)?.encrypt(&params).await
    }

    /// Decrypt `params.ciphertext`. Locally this needs the private key.
    pub async fn decrypt(&self, params: DecryptParameters) -> Result<DecryptResult> {
        if let Some(local) = self.local_for(KeyOperation::Decrypt).await? {
            match local.decrypt(&params).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::Decrypt)?.decrypt(&params).await
    }

    /// Sign a digest computed with the hash of `algorithm`.
    pub async fn sign(&self, algorithm: SignatureAlgorithm, digest: &[u8]) -> Result<SignResult> {
        if let Some(local) = self.local_for(KeyOperation::Sign).await? {
            match local.sign(algorithm, digest).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::Sign)?
            .sign(algorithm, digest)
            .await
    }

    /// Verify `signature` over `digest`.
    ///
    /// A signature that doesn't match is not an error, check
    /// [`VerifyResult::is_valid`].
    pub async fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyResult> {
        if let Some(local) = self.local_for(KeyOperation::Verify).await? {
            match local.verify(algorithm, digest, signature).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::Verify)?
            .verify(algorithm, digest, signature)
            .await
    }

    /// Wrap a symmetric key. AES key wrap always runs on the service.
    pub async fn wrap_key(&self, algorithm: KeyWrapAlgorithm, key: &[u8]) -> Result<WrapResult> {
        if let Some(local) = self.local_for(KeyOperation::WrapKey).await? {
            match local.wrap_key(algorithm, key).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::WrapKey)?
            .wrap_key(algorithm, key)
            .await
    }

    /// Unwrap a key previously wrapped with the same algorithm and key.
    pub async fn unwrap_key(
        &self,
        algorithm: KeyWrapAlgorithm,
        encrypted_key: &[u8],
    ) -> Result<UnwrapResult> {
        if let Some(local) = self.local_for(KeyOperation::UnwrapKey).await? {
            match local.unwrap_key(algorithm, encrypted_key).await {
                Err(err) if self.falls_back(&err) => {}
                res => return res,
            }
        }
        self.remote_for(KeyOperation::UnwrapKey)?
            .unwrap_key(algorithm, encrypted_key)
            .await
    }

    /// Hash `data` with the hash of `algorithm` and sign the digest.
    pub async fn sign_data(&self, algorithm: SignatureAlgorithm, data: &[u8]) -> Result<SignResult> {
        let digest = algorithm.hash_algorithm().digest(data);
        self.sign(algorithm, &digest).await
    }

    /// Hash `data` with the hash of `algorithm` and verify `signature` over the digest.
    pub async fn verify_data(
        &self,
        algorithm: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<VerifyResult> {
        let digest = algorithm.hash_algorithm().digest(data);
        self.verify(algorithm, &digest, signature).await
    }

    /// Like [`Self::sign_data`], but hashes `reader` in chunks instead of
    /// taking all data at once.
    pub async fn sign_reader(&self, algorithm: SignatureAlgorithm, reader: impl Read) -> Result<SignResult> {
        let digest = algorithm.hash_algorithm().digest_reader(reader)?;
        self.sign(algorithm, &digest).await
    }

    /// Like [`Self::verify_data`], but hashes `reader` in chunks.
    pub async fn verify_reader(
        &self,
        algorithm: SignatureAlgorithm,
        reader: impl Read,
        signature: &[u8],
    ) -> Result<VerifyResult> {
        let digest = algorithm.hash_algorithm().digest_reader(reader)?;
        self.verify(algorithm, &digest, signature).await
    }
}

/// Build the pipeline for a key or vault url.
pub(crate) fn new_pipeline(
    url: &str,
    ctx: Context,
    credential: impl ProvideCredential<Credential = AccessToken>,
    config: &Config,
) -> Result<Arc<Pipeline>> {
    config.validate()?;
    KeyVaultKeyIdentifier::parse(url)?;
    let scope = config.scope_for(url)?;
    Ok(Arc::new(Pipeline::new(
        ctx,
        scope,
        config.api_version(),
        credential,
    )))
}
