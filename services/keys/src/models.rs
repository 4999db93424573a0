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

use keyvault_crypto_core::Result;

use crate::algorithm::{EncryptionAlgorithm, KeyWrapAlgorithm, SignatureAlgorithm};

/// Parameters of an encrypt operation.
///
/// `iv` and `additional_authenticated_data` are only meaningful for the AES
/// algorithms, which are always executed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptParameters {
    /// Encryption algorithm.
    pub algorithm: EncryptionAlgorithm,
    /// Data to encrypt.
    pub plaintext: Vec<u8>,
    /// Initialization vector.
    pub iv: Option<Vec<u8>>,
    /// Additional authenticated data.
    pub additional_authenticated_data: Option<Vec<u8>>,
}

impl EncryptParameters {
    /// Create encrypt parameters.
    pub fn new(algorithm: EncryptionAlgorithm, plaintext: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            plaintext: plaintext.into(),
            iv: None,
            additional_authenticated_data: None,
        }
    }

    /// Create encrypt parameters from an algorithm identifier such as `RSA-OAEP`.
    ///
    /// Fails with a validation error for an empty or unknown identifier.
    pub fn parse(algorithm: &str, plaintext: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::new(algorithm.parse()?, plaintext))
    }

    /// Set the initialization vector.
    pub fn with_iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    /// Set the additional authenticated data.
    pub fn with_additional_authenticated_data(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.additional_authenticated_data = Some(aad.into());
        self
    }
}

/// Parameters of a decrypt operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptParameters {
    /// Encryption algorithm the ciphertext was produced with.
    pub algorithm: EncryptionAlgorithm,
    /// Data to decrypt.
    pub ciphertext: Vec<u8>,
    /// Initialization vector.
    pub iv: Option<Vec<u8>>,
    /// Additional authenticated data.
    pub additional_authenticated_data: Option<Vec<u8>>,
    /// Authentication tag.
    pub authentication_tag: Option<Vec<u8>>,
}

impl DecryptParameters {
    /// Create decrypt parameters.
    pub fn new(algorithm: EncryptionAlgorithm, ciphertext: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            ciphertext: ciphertext.into(),
            iv: None,
            additional_authenticated_data: None,
            authentication_tag: None,
        }
    }

    /// Create decrypt parameters from an algorithm identifier.
    ///
    /// Fails with a validation error for an empty or unknown identifier.
    pub fn parse(algorithm: &str, ciphertext: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::new(algorithm.parse()?, ciphertext))
    }

    /// Set the initialization vector.
    pub fn with_iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = Some(iv.into());
        self
    }

    /// Set the additional authenticated data.
    pub fn with_additional_authenticated_data(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.additional_authenticated_data = Some(aad.into());
        self
    }

    /// Set the authentication tag.
    pub fn with_authentication_tag(mut self, tag: impl Into<Vec<u8>>) -> Self {
        self.authentication_tag = Some(tag.into());
        self
    }
}

/// Result of an encrypt operation.
///
/// Keep `key_id` and `algorithm` together with the ciphertext, decrypting
/// needs both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: EncryptionAlgorithm,
    /// Encrypted data.
    pub ciphertext: Vec<u8>,
    /// Initialization vector, set when the algorithm uses one.
    pub iv: Option<Vec<u8>>,
    /// Authentication tag, set for authenticated encryption.
    pub authentication_tag: Option<Vec<u8>>,
    /// Additional authenticated data, echoed back by the service.
    pub additional_authenticated_data: Option<Vec<u8>>,
}

/// Result of a decrypt operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: EncryptionAlgorithm,
    /// Decrypted data.
    pub plaintext: Vec<u8>,
}

/// Result of a sign operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: SignatureAlgorithm,
    /// Signature over the digest.
    pub signature: Vec<u8>,
}

/// Result of a verify operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: SignatureAlgorithm,
    /// Whether the signature matches the digest.
    pub is_valid: bool,
}

/// Result of a wrap key operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: KeyWrapAlgorithm,
    /// The wrapped key.
    pub encrypted_key: Vec<u8>,
}

/// Result of an unwrap key operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapResult {
    /// Identifier of the key used.
    pub key_id: String,
    /// Algorithm used.
    pub algorithm: KeyWrapAlgorithm,
    /// The unwrapped key.
    pub key: Vec<u8>,
}
