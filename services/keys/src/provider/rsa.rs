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

use std::fmt::{Debug, Formatter};

use keyvault_crypto_core::{Error, Result};
use rand::thread_rng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use crate::algorithm::{EncryptionAlgorithm, HashAlgorithm, KeyWrapAlgorithm, SignatureAlgorithm};
use crate::key::{JsonWebKey, KeyOperation};

/// RSA encryption padding selected by an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Padding {
    Pkcs1v15,
    OaepSha1,
    OaepSha256,
}

impl TryFrom<EncryptionAlgorithm> for Padding {
    type Error = Error;

    fn try_from(alg: EncryptionAlgorithm) -> Result<Self> {
        match alg {
            EncryptionAlgorithm::Rsa15 => Ok(Padding::Pkcs1v15),
            EncryptionAlgorithm::RsaOaep => Ok(Padding::OaepSha1),
            EncryptionAlgorithm::RsaOaep256 => Ok(Padding::OaepSha256),
            alg => Err(unsupported(alg)),
        }
    }
}

impl TryFrom<KeyWrapAlgorithm> for Padding {
    type Error = Error;

    fn try_from(alg: KeyWrapAlgorithm) -> Result<Self> {
        match alg {
            KeyWrapAlgorithm::Rsa15 => Ok(Padding::Pkcs1v15),
            KeyWrapAlgorithm::RsaOaep => Ok(Padding::OaepSha1),
            KeyWrapAlgorithm::RsaOaep256 => Ok(Padding::OaepSha256),
            alg => Err(unsupported(alg)),
        }
    }
}

fn unsupported(alg: impl std::fmt::Display) -> Error {
    Error::unsupported_algorithm(format!("algorithm {alg} is not supported by the local RSA provider"))
}

fn crypto_error(op: &str, err: rsa::Error) -> Error {
    Error::unexpected(format!("local RSA {op} failed")).with_source(err)
}

/// Performs RSA operations with key material held by the client.
pub(crate) struct RsaCryptographyProvider {
    key: JsonWebKey,
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl Debug for RsaCryptographyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaCryptographyProvider")
            .field("key_id", &self.key.id)
            .field("bits", &(self.public.size() * 8))
            .field("private", &self.private.is_some())
            .finish()
    }
}

impl RsaCryptographyProvider {
    /// Build a provider from the key's `n` and `e`, plus `d`, `p` and `q` if present.
    pub fn new(key: JsonWebKey) -> Result<Self> {
        let (Some(n), Some(e)) = (&key.n, &key.e) else {
            return Err(Error::validation("RSA key must have modulus and public exponent"));
        };
        let n = BigUint::from_bytes_be(n);
        let e = BigUint::from_bytes_be(e);

        let private = match (&key.d, &key.p, &key.q) {
            (Some(d), Some(p), Some(q)) => Some(
                RsaPrivateKey::from_components(
                    n.clone(),
                    e.clone(),
                    BigUint::from_bytes_be(d),
                    vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
                )
                .map_err(|err| {
                    Error::validation("invalid RSA private key components").with_source(err)
                })?,
            ),
            _ => None,
        };
        let public = match &private {
            Some(k) => k.to_public_key(),
            None => RsaPublicKey::new(n, e).map_err(|err| {
                Error::validation("invalid RSA public key components").with_source(err)
            })?,
        };

        Ok(Self {
            key,
            public,
            private,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key.id
    }

    /// The key permits `op` and holds the material it needs.
    pub fn supports_operation(&self, op: &KeyOperation) -> bool {
        self.key.supports_operation(op) && (!op.is_private() || self.private.is_some())
    }

    fn private_key(&self) -> Result<&RsaPrivateKey> {
        self.private
            .as_ref()
            .ok_or_else(|| Error::validation("RSA key has no private material"))
    }

    fn encrypt_with(&self, padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
        let mut rng = thread_rng();
        let encrypted = match padding {
            Padding::Pkcs1v15 => self.public.encrypt(&mut rng, Pkcs1v15Encrypt, data),
            Padding::OaepSha1 => self.public.encrypt(&mut rng, Oaep::new::<sha1::Sha1>(), data),
            Padding::OaepSha256 => self.public.encrypt(&mut rng, Oaep::new::<Sha256>(), data),
        };
        encrypted.map_err(|err| crypto_error("encryption", err))
    }

    fn decrypt_with(&self, padding: Padding, data: &[u8]) -> Result<Vec<u8>> {
        let key = self.private_key()?;
        let decrypted = match padding {
            Padding::Pkcs1v15 => key.decrypt(Pkcs1v15Encrypt, data),
            Padding::OaepSha1 => key.decrypt(Oaep::new::<sha1::Sha1>(), data),
            Padding::OaepSha256 => key.decrypt(Oaep::new::<Sha256>(), data),
        };
        decrypted.map_err(|err| crypto_error("decryption", err))
    }

    pub fn encrypt(&self, alg: EncryptionAlgorithm, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_with(alg.try_into()?, plaintext)
    }

    pub fn decrypt(&self, alg: EncryptionAlgorithm, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(alg.try_into()?, ciphertext)
    }

    pub fn wrap_key(&self, alg: KeyWrapAlgorithm, key: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_with(alg.try_into()?, key)
    }

    pub fn unwrap_key(&self, alg: KeyWrapAlgorithm, encrypted_key: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(alg.try_into()?, encrypted_key)
    }

    pub fn sign(&self, alg: SignatureAlgorithm, digest: &[u8]) -> Result<Vec<u8>> {
        let hash = alg.hash_algorithm();
        if digest.len() != hash.output_len() {
            return Err(Error::validation(format!(
                "digest for {alg} must be {} bytes, got {}",
                hash.output_len(),
                digest.len()
            )));
        }

        let signed = match alg {
            SignatureAlgorithm::Rs256 | SignatureAlgorithm::Rs384 | SignatureAlgorithm::Rs512 => {
                self.private_key()?.sign(pkcs1v15_scheme(hash), digest)
            }
            SignatureAlgorithm::Ps256 | SignatureAlgorithm::Ps384 | SignatureAlgorithm::Ps512 => {
                self.private_key()?
                    .sign_with_rng(&mut thread_rng(), pss_scheme(hash), digest)
            }
            alg => return Err(unsupported(alg)),
        };
        signed.map_err(|err| crypto_error("signing", err))
    }

    /// A signature that doesn't match is `Ok(false)`.
    pub fn verify(&self, alg: SignatureAlgorithm, digest: &[u8], signature: &[u8]) -> Result<bool> {
        let hash = alg.hash_algorithm();
        let verified = match alg {
            SignatureAlgorithm::Rs256 | SignatureAlgorithm::Rs384 | SignatureAlgorithm::Rs512 => {
                self.public.verify(pkcs1v15_scheme(hash), digest, signature)
            }
            SignatureAlgorithm::Ps256 | SignatureAlgorithm::Ps384 | SignatureAlgorithm::Ps512 => {
                self.public.verify(pss_scheme(hash), digest, signature)
            }
            alg => return Err(unsupported(alg)),
        };
        Ok(verified.is_ok())
    }
}

fn pkcs1v15_scheme(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

// Salt length equals the digest length.
fn pss_scheme(hash: HashAlgorithm) -> Pss {
    match hash {
        HashAlgorithm::Sha256 => Pss::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pss::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pss::new::<Sha512>(),
    }
}
