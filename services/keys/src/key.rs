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

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use http::Uri;
use keyvault_crypto_core::time::{from_unix_seconds, DateTime};
use keyvault_crypto_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::base64url;
use crate::constants::KEYS_COLLECTION;

macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this crate doesn't know about, kept verbatim.
            Unknown(String),
        }

        impl $name {
            /// The identifier used on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(v) => v,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($value => $name::$variant,)+
                    v => $name::Unknown(v.to_string()),
                }
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
                Ok($name::from(s.as_str()))
            }
        }
    };
}

open_enum! {
    /// JSON web key type.
    KeyType {
        /// Elliptic curve key
        Ec => "EC",
        /// Elliptic curve key stored in a HSM
        EcHsm => "EC-HSM",
        /// RSA key
        Rsa => "RSA",
        /// RSA key stored in a HSM
        RsaHsm => "RSA-HSM",
        /// Octet sequence (symmetric) key
        Oct => "oct",
        /// Octet sequence key stored in a HSM
        OctHsm => "oct-HSM",
        /// Octet key pair
        Okp => "OKP",
        /// Octet key pair stored in a HSM
        OkpHsm => "OKP-HSM",
    }
}

impl Default for KeyType {
    fn default() -> Self {
        KeyType::Unknown(String::new())
    }
}

impl KeyType {
    /// Check if the key type is one of the RSA types.
    pub fn is_rsa(&self) -> bool {
        matches!(self, KeyType::Rsa | KeyType::RsaHsm)
    }
}

open_enum! {
    /// An operation a key permits.
    KeyOperation {
        /// Encrypt with the key
        Encrypt => "encrypt",
        /// Decrypt with the key
        Decrypt => "decrypt",
        /// Sign a digest
        Sign => "sign",
        /// Verify a signature
        Verify => "verify",
        /// Wrap another key
        WrapKey => "wrapKey",
        /// Unwrap another key
        UnwrapKey => "unwrapKey",
        /// Import the key
        Import => "import",
        /// Export the key
        Export => "export",
    }
}

impl KeyOperation {
    /// Check if the operation needs the private part of an asymmetric key.
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            KeyOperation::Decrypt | KeyOperation::Sign | KeyOperation::UnwrapKey
        )
    }
}

/// Key material in the JSON web key representation used by key vault.
///
/// All byte components are big-endian and travel as base64url without padding.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key identifier, a key vault url for keys fetched from the service.
    #[serde(rename = "kid", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Key type.
    #[serde(rename = "kty", default)]
    pub key_type: KeyType,
    /// Operations this key permits.
    #[serde(default)]
    pub key_ops: Vec<KeyOperation>,
    /// Elliptic curve name.
    #[serde(rename = "crv", default, skip_serializing_if = "Option::is_none")]
    pub curve_name: Option<String>,

    /// RSA modulus.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub n: Option<Vec<u8>>,
    /// RSA public exponent.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub e: Option<Vec<u8>>,
    /// RSA private exponent or EC private scalar.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub d: Option<Vec<u8>>,
    /// RSA first factor CRT exponent.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub dp: Option<Vec<u8>>,
    /// RSA second factor CRT exponent.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub dq: Option<Vec<u8>>,
    /// RSA CRT coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub qi: Option<Vec<u8>>,
    /// RSA first prime factor.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub p: Option<Vec<u8>>,
    /// RSA second prime factor.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub q: Option<Vec<u8>>,
    /// Symmetric key.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub k: Option<Vec<u8>>,
    /// HSM token, used with bring your own key.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub t: Option<Vec<u8>>,
    /// EC x coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub x: Option<Vec<u8>>,
    /// EC y coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub y: Option<Vec<u8>>,
}

impl Debug for JsonWebKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let private = |v: &Option<Vec<u8>>| v.as_ref().map(|_| "***");
        f.debug_struct("JsonWebKey")
            .field("id", &self.id)
            .field("key_type", &self.key_type)
            .field("key_ops", &self.key_ops)
            .field("curve_name", &self.curve_name)
            .field("n", &self.n.as_ref().map(Vec::len))
            .field("e", &self.e)
            .field("d", &private(&self.d))
            .field("p", &private(&self.p))
            .field("q", &private(&self.q))
            .field("k", &private(&self.k))
            .finish_non_exhaustive()
    }
}

impl JsonWebKey {
    /// Check if the key declares `op` in its permitted operations.
    pub fn supports_operation(&self, op: &KeyOperation) -> bool {
        self.key_ops.contains(op)
    }
}

/// The parts of a key vault key identifier.
///
/// `https://{vault}/keys/{name}[/{version}]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVaultKeyIdentifier {
    /// The full identifier this was parsed from.
    pub source_id: String,
    /// Scheme and authority of the vault, without trailing slash.
    pub vault_url: String,
    /// Key name.
    pub name: String,
    /// Key version, if the identifier names one.
    pub version: Option<String>,
}

impl KeyVaultKeyIdentifier {
    /// Parse a key identifier url.
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("invalid key vault key identifier: {id}"));

        let uri: Uri = id.parse().map_err(|e| invalid().with_source(e))?;
        let scheme = uri.scheme_str().ok_or_else(invalid)?;
        let authority = uri.authority().ok_or_else(invalid)?;

        let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
        let (name, version) = match segments.as_slice() {
            [collection, name] if *collection == KEYS_COLLECTION => (*name, None),
            [collection, name, version] if *collection == KEYS_COLLECTION => {
                (*name, Some(version.to_string()))
            }
            _ => return Err(invalid()),
        };

        Ok(Self {
            source_id: id.to_string(),
            vault_url: format!("{scheme}://{authority}"),
            name: name.to_string(),
            version,
        })
    }
}

/// Administrative metadata of a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyProperties {
    /// Key name.
    pub name: String,
    /// Key identifier.
    pub id: String,
    /// Vault url the key lives in.
    pub vault_url: String,
    /// Key version.
    pub version: String,
    /// Whether the key is enabled.
    pub enabled: Option<bool>,
    /// The key is not usable before this time.
    pub not_before: Option<DateTime>,
    /// The key is not usable after this time.
    pub expires_on: Option<DateTime>,
    /// Creation time.
    pub created_on: Option<DateTime>,
    /// Last update time.
    pub updated_on: Option<DateTime>,
    /// Soft delete retention in days.
    pub recoverable_days: Option<i32>,
    /// Recovery level of the vault for this key.
    pub recovery_level: Option<String>,
    /// Whether the private key can be exported.
    pub exportable: Option<bool>,
    /// Whether the key's lifetime is managed by key vault.
    pub managed: bool,
    /// Application specific metadata.
    pub tags: HashMap<String, String>,
}

/// A key vault key: material plus properties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "KeyBundle")]
pub struct KeyVaultKey {
    /// Key material.
    pub key: JsonWebKey,
    /// Key properties.
    pub properties: KeyProperties,
}

impl KeyVaultKey {
    /// Key identifier.
    pub fn id(&self) -> &str {
        &self.key.id
    }

    /// Key name.
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// Key type.
    pub fn key_type(&self) -> &KeyType {
        &self.key.key_type
    }
}

#[derive(Deserialize)]
struct KeyBundle {
    #[serde(default)]
    key: Option<JsonWebKey>,
    #[serde(default)]
    attributes: Option<KeyAttributes>,
    #[serde(default)]
    tags: Option<HashMap<String, String>>,
    #[serde(default)]
    managed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyAttributes {
    enabled: Option<bool>,
    nbf: Option<i64>,
    exp: Option<i64>,
    created: Option<i64>,
    updated: Option<i64>,
    recoverable_days: Option<i32>,
    recovery_level: Option<String>,
    exportable: Option<bool>,
}

impl From<KeyBundle> for KeyVaultKey {
    fn from(bundle: KeyBundle) -> Self {
        let key = bundle.key.unwrap_or_default();
        let mut properties = KeyProperties {
            id: key.id.clone(),
            managed: bundle.managed.unwrap_or(false),
            tags: bundle.tags.unwrap_or_default(),
            ..Default::default()
        };

        // A key without a parsable id keeps empty name and version.
        if let Ok(id) = KeyVaultKeyIdentifier::parse(&key.id) {
            properties.name = id.name;
            properties.vault_url = id.vault_url;
            properties.version = id.version.unwrap_or_default();
        }

        if let Some(attrs) = bundle.attributes {
            properties.enabled = attrs.enabled;
            properties.not_before = attrs.nbf.and_then(from_unix_seconds);
            properties.expires_on = attrs.exp.and_then(from_unix_seconds);
            properties.created_on = attrs.created.and_then(from_unix_seconds);
            properties.updated_on = attrs.updated.and_then(from_unix_seconds);
            properties.recoverable_days = attrs.recoverable_days;
            properties.recovery_level = attrs.recovery_level;
            properties.exportable = attrs.exportable;
        }

        KeyVaultKey { key, properties }
    }
}
