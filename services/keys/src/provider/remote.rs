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

use keyvault_crypto_core::Result;

use crate::algorithm::{KeyWrapAlgorithm, SignatureAlgorithm};
use crate::constants::*;
use crate::key::KeyVaultKey;
use crate::models::*;
use crate::pipeline::Pipeline;
use crate::wire::*;

/// Forwards operations to the key vault service.
///
/// The caller's algorithm is put on every result since responses don't carry
/// it, and a missing `kid` falls back to the key id this client was built for.
#[derive(Debug, Clone)]
pub(crate) struct RemoteCryptographyClient {
    key_id: String,
    pipeline: Arc<Pipeline>,
}

impl RemoteCryptographyClient {
    pub fn new(key_id: impl Into<String>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            key_id: key_id.into(),
            pipeline,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    fn result_key_id(&self, kid: String) -> String {
        if kid.is_empty() {
            self.key_id.clone()
        } else {
            kid
        }
    }

    /// Fetch the key this client is bound to.
    pub async fn get_key(&self) -> Result<KeyVaultKey> {
        let url = self.pipeline.key_id_url(&self.key_id);
        self.pipeline.get_json(&url).await
    }

    async fn call<T: serde::Serialize>(&self, operation: &str, body: &T) -> Result<KeyOperationResult> {
        let url = self.pipeline.operation_url(&self.key_id, operation);
        self.pipeline.post_json(&url, body).await
    }

    pub async fn encrypt(&self, params: &EncryptParameters) -> Result<EncryptResult> {
        let mut body = KeyOperationParameters::new(params.algorithm.as_str(), params.plaintext.clone());
        body.iv = params.iv.clone();
        body.aad = params.additional_authenticated_data.clone();

        let resp = self.call(ENCRYPT, &body).await?;
        Ok(EncryptResult {
            key_id: self.result_key_id(resp.kid),
            algorithm: params.algorithm,
            ciphertext: resp.value,
            iv: resp.iv,
            authentication_tag: resp.tag,
            additional_authenticated_data: resp.aad,
        })
    }

    pub async fn decrypt(&self, params: &DecryptParameters) -> Result<DecryptResult> {
        let mut body = KeyOperationParameters::new(params.algorithm.as_str(), params.ciphertext.clone());
        body.iv = params.iv.clone();
        body.aad = params.additional_authenticated_data.clone();
        body.tag = params.authentication_tag.clone();

        let resp = self.call(DECRYPT, &body).await?;
        Ok(DecryptResult {
            key_id: self.result_key_id(resp.kid),
            algorithm: params.algorithm,
            plaintext: resp.value,
        })
    }

    pub async fn sign(&self, algorithm: SignatureAlgorithm, digest: &[u8]) -> Result<SignResult> {
        let body = KeySignParameters {
            alg: algorithm.as_str(),
            value: digest.to_vec(),
        };

        let resp = self.call(SIGN, &body).await?;
        Ok(SignResult {
            key_id: self.result_key_id(resp.kid),
            algorithm,
            signature: resp.value,
        })
    }

    pub async fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyResult> {
        let body = KeyVerifyParameters {
            alg: algorithm.as_str(),
            digest: digest.to_vec(),
            value: signature.to_vec(),
        };

        let url = self.pipeline.operation_url(&self.key_id, VERIFY);
        let resp: KeyVerifyResult = self.pipeline.post_json(&url, &body).await?;
        Ok(VerifyResult {
            key_id: self.key_id.clone(),
            algorithm,
            is_valid: resp.value,
        })
    }

    pub async fn wrap_key(&self, algorithm: KeyWrapAlgorithm, key: &[u8]) -> Result<WrapResult> {
        let body = KeyOperationParameters::new(algorithm.as_str(), key.to_vec());

        let resp = self.call(WRAP_KEY, &body).await?;
        Ok(WrapResult {
            key_id: self.result_key_id(resp.kid),
            algorithm,
            encrypted_key: resp.value,
        })
    }

    pub async fn unwrap_key(&self, algorithm: KeyWrapAlgorithm, encrypted_key: &[u8]) -> Result<UnwrapResult> {
        let body = KeyOperationParameters::new(algorithm.as_str(), encrypted_key.to_vec());

        let resp = self.call(UNWRAP_KEY, &body).await?;
        Ok(UnwrapResult {
            key_id: self.result_key_id(resp.kid),
            algorithm,
            key: resp.value,
        })
    }
}
