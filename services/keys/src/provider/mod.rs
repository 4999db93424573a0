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

//! Where an operation runs: in process with local key material, or on the service.

mod remote;
pub(crate) use remote::RemoteCryptographyClient;

mod rsa;
pub(crate) use self::rsa::RsaCryptographyProvider;

#[cfg(test)]
pub(crate) use self::rsa::tests::{json_web_key, KEY_A, KEY_B};

use keyvault_crypto_core::{Error, Result};
use log::debug;

use crate::algorithm::{KeyWrapAlgorithm, SignatureAlgorithm};
use crate::key::{JsonWebKey, KeyOperation};
use crate::models::*;

#[derive(Debug)]
pub(crate) enum Provider {
    None,
    RsaLocal(RsaCryptographyProvider),
    Remote(RemoteCryptographyClient),
}

impl Provider {
    /// Pick the local provider for `key`. Only RSA keys have one.
    pub fn local(key: &JsonWebKey) -> Result<Provider> {
        if !key.key_type.is_rsa() {
            debug!(
                "no local provider for key {} of type {}",
                key.id,
                key.key_type.as_str()
            );
            return Ok(Provider::None);
        }

        let provider = RsaCryptographyProvider::new(key.clone())?;
        debug!("using local RSA provider for key {}", key.id);
        Ok(Provider::RsaLocal(provider))
    }

    pub fn can_remote(&self) -> bool {
        matches!(self, Provider::Remote(_))
    }

    pub fn supports_operation(&self, op: &KeyOperation) -> bool {
        match self {
            Provider::None => false,
            Provider::RsaLocal(p) => p.supports_operation(op),
            Provider::Remote(_) => true,
        }
    }

    fn unsupported(&self, op: KeyOperation) -> Error {
        Error::validation(format!("operation {} is not supported", op.as_str()))
    }

    pub async fn encrypt(&self, params: &EncryptParameters) -> Result<EncryptResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::Encrypt)),
            Provider::RsaLocal(p) => Ok(EncryptResult {
                key_id: p.key_id().to_string(),
                algorithm: params.algorithm,
                ciphertext: p.encrypt(params.algorithm, &params.plaintext)?,
                iv: None,
                authentication_tag: None,
                additional_authenticated_data: None,
            }),
            Provider::Remote(c) => c.encrypt(params).await,
        }
    }

    pub async fn decrypt(&self, params: &DecryptParameters) -> Result<DecryptResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::Decrypt)),
            Provider::RsaLocal(p) => Ok(DecryptResult {
                key_id: p.key_id().to_string(),
                algorithm: params.algorithm,
                plaintext: p.decrypt(params.algorithm, &params.ciphertext)?,
            }),
            Provider::Remote(c) => c.decrypt(params).await,
        }
    }

    pub async fn sign(&self, algorithm: SignatureAlgorithm, digest: &[u8]) -> Result<SignResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::Sign)),
            Provider::RsaLocal(p) => Ok(SignResult {
                key_id: p.key_id().to_string(),
                algorithm,
                signature: p.sign(algorithm, digest)?,
            }),
            Provider::Remote(c) => c.sign(algorithm, digest).await,
        }
    }

    pub async fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::Verify)),
            Provider::RsaLocal(p) => Ok(VerifyResult {
                key_id: p.key_id().to_string(),
                algorithm,
                is_valid: p.verify(algorithm, digest, signature)?,
            }),
            Provider::Remote(c) => c.verify(algorithm, digest, signature).await,
        }
    }

    pub async fn wrap_key(&self, algorithm: KeyWrapAlgorithm, key: &[u8]) -> Result<WrapResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::WrapKey)),
            Provider::RsaLocal(p) => Ok(WrapResult {
                key_id: p.key_id().to_string(),
                algorithm,
                encrypted_key: p.wrap_key(algorithm, key)?,
            }),
            Provider::Remote(c) => c.wrap_key(algorithm, key).await,
        }
    }

    pub async fn unwrap_key(&self, algorithm: KeyWrapAlgorithm, encrypted_key: &[u8]) -> Result<UnwrapResult> {
        match self {
            Provider::None => Err(self.unsupported(KeyOperation::UnwrapKey)),
            Provider::RsaLocal(p) => Ok(UnwrapResult {
                key_id: p.key_id().to_string(),
                algorithm,
                key: p.unwrap_key(algorithm, encrypted_key)?,
            }),
            Provider::Remote(c) => c.unwrap_key(algorithm, encrypted_key).await,
        }
    }
}
