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

//! JSON bodies of the key operation REST calls.

use serde::{Deserialize, Serialize};

use crate::base64url;

/// Body of encrypt, decrypt, wrapKey and unwrapKey.
#[derive(Debug, Serialize)]
pub(crate) struct KeyOperationParameters {
    pub alg: &'static str,
    #[serde(with = "base64url")]
    pub value: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub iv: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub aad: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64url::option")]
    pub tag: Option<Vec<u8>>,
}

impl KeyOperationParameters {
    pub fn new(alg: &'static str, value: Vec<u8>) -> Self {
        Self {
            alg,
            value,
            iv: None,
            aad: None,
            tag: None,
        }
    }
}

/// Body of sign.
#[derive(Debug, Serialize)]
pub(crate) struct KeySignParameters {
    pub alg: &'static str,
    #[serde(with = "base64url")]
    pub value: Vec<u8>,
}

/// Body of verify: `value` is the signature.
#[derive(Debug, Serialize)]
pub(crate) struct KeyVerifyParameters {
    pub alg: &'static str,
    #[serde(with = "base64url")]
    pub digest: Vec<u8>,
    #[serde(with = "base64url")]
    pub value: Vec<u8>,
}

/// Response of encrypt, decrypt, sign, wrapKey and unwrapKey.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyOperationResult {
    #[serde(default)]
    pub kid: String,
    #[serde(with = "base64url")]
    pub value: Vec<u8>,
    #[serde(default, with = "base64url::option")]
    pub iv: Option<Vec<u8>>,
    #[serde(default, with = "base64url::option")]
    pub aad: Option<Vec<u8>>,
    #[serde(default, with = "base64url::option")]
    pub tag: Option<Vec<u8>>,
}

/// Response of verify. The service doesn't echo the key id.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyVerifyResult {
    pub value: bool,
}
