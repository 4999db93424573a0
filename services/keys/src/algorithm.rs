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

//! Algorithms accepted by the key vault cryptography operations.
//!
//! Every algorithm is a closed enum. Strings are only accepted at the boundary
//! through [`FromStr`], which rejects empty and unknown identifiers, so the
//! dispatch logic never sees an arbitrary string.

use keyvault_crypto_core::hash::{sha256, sha384, sha512};
use keyvault_crypto_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

/// Data read by [`HashAlgorithm::digest_reader`] is hashed in chunks of this size.
const DIGEST_CHUNK_SIZE: usize = 1024 * 1024;

macro_rules! algorithm_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All known values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The identifier used on the wire.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    "" => Err(Error::validation(concat!(
                        "the value for the ",
                        $label,
                        " can not be empty"
                    ))),
                    $($value => Ok($name::$variant),)+
                    v => Err(Error::validation(format!(concat!("unknown ", $label, ": {}"), v))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

algorithm_enum! {
    /// An algorithm used for encryption and decryption.
    EncryptionAlgorithm, "encryption algorithm" {
        /// RSAES-PKCS1-v1_5
        Rsa15 => "RSA1_5",
        /// RSAES-OAEP with SHA-1 and MGF1 with SHA-1
        RsaOaep => "RSA-OAEP",
        /// RSAES-OAEP with SHA-256 and MGF1 with SHA-256
        RsaOaep256 => "RSA-OAEP-256",
        /// 128-bit AES-GCM
        A128Gcm => "A128GCM",
        /// 192-bit AES-GCM
        A192Gcm => "A192GCM",
        /// 256-bit AES-GCM
        A256Gcm => "A256GCM",
        /// 128-bit AES-CBC
        A128Cbc => "A128CBC",
        /// 192-bit AES-CBC
        A192Cbc => "A192CBC",
        /// 256-bit AES-CBC
        A256Cbc => "A256CBC",
        /// 128-bit AES-CBC with PKCS padding
        A128CbcPad => "A128CBCPAD",
        /// 192-bit AES-CBC with PKCS padding
        A192CbcPad => "A192CBCPAD",
        /// 256-bit AES-CBC with PKCS padding
        A256CbcPad => "A256CBCPAD",
    }
}

algorithm_enum! {
    /// An algorithm used for key wrap and unwrap.
    KeyWrapAlgorithm, "key wrap algorithm" {
        /// RSAES-PKCS1-v1_5
        Rsa15 => "RSA1_5",
        /// RSAES-OAEP with SHA-1 and MGF1 with SHA-1
        RsaOaep => "RSA-OAEP",
        /// RSAES-OAEP with SHA-256 and MGF1 with SHA-256
        RsaOaep256 => "RSA-OAEP-256",
        /// 128-bit AES key wrap
        A128Kw => "A128KW",
        /// 192-bit AES key wrap
        A192Kw => "A192KW",
        /// 256-bit AES key wrap
        A256Kw => "A256KW",
    }
}

algorithm_enum! {
    /// An algorithm used for signing and verification.
    SignatureAlgorithm, "signature algorithm" {
        /// RSASSA-PKCS1-v1_5 using SHA-256
        Rs256 => "RS256",
        /// RSASSA-PKCS1-v1_5 using SHA-384
        Rs384 => "RS384",
        /// RSASSA-PKCS1-v1_5 using SHA-512
        Rs512 => "RS512",
        /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
        Ps256 => "PS256",
        /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
        Ps384 => "PS384",
        /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
        Ps512 => "PS512",
        /// ECDSA using P-256 and SHA-256
        Es256 => "ES256",
        /// ECDSA using P-384 and SHA-384
        Es384 => "ES384",
        /// ECDSA using P-521 and SHA-512
        Es512 => "ES512",
        /// ECDSA using secp256k1 and SHA-256
        Es256K => "ES256K",
    }
}

/// Hash algorithm a [`SignatureAlgorithm`] signs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Hash `data` into a digest suitable for sign and verify.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => sha256(data),
            HashAlgorithm::Sha384 => sha384(data),
            HashAlgorithm::Sha512 => sha512(data),
        }
    }

    /// Hash everything `reader` yields without holding it in memory at once.
    pub fn digest_reader(&self, reader: impl Read) -> Result<Vec<u8>> {
        match self {
            HashAlgorithm::Sha256 => digest_chunks::<Sha256>(reader),
            HashAlgorithm::Sha384 => digest_chunks::<Sha384>(reader),
            HashAlgorithm::Sha512 => digest_chunks::<Sha512>(reader),
        }
    }

    /// Length of the digest in bytes.
    pub const fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

fn digest_chunks<D: Digest>(mut reader: impl Read) -> Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buf = vec![0; DIGEST_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(Error::unexpected("failed to read data to hash").with_source(err))
            }
        }
    }
    Ok(hasher.finalize().to_vec())
}

impl SignatureAlgorithm {
    /// Get the hash algorithm associated with this signature algorithm.
    pub const fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            SignatureAlgorithm::Rs256
            | SignatureAlgorithm::Ps256
            | SignatureAlgorithm::Es256
            | SignatureAlgorithm::Es256K => HashAlgorithm::Sha256,
            SignatureAlgorithm::Rs384 | SignatureAlgorithm::Ps384 | SignatureAlgorithm::Es384 => {
                HashAlgorithm::Sha384
            }
            SignatureAlgorithm::Rs512 | SignatureAlgorithm::Ps512 | SignatureAlgorithm::Es512 => {
                HashAlgorithm::Sha512
            }
        }
    }
}
