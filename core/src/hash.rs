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

//! Hash and encoding related utils.

use crate::Error;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

/// Base64url encode without padding, as used by every JOSE payload.
pub fn base64url_encode(content: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(content)
}

/// Base64url decode.
///
/// Trailing `=` padding is tolerated, the alphabet must be the url-safe one.
pub fn base64url_decode(content: &str) -> crate::Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(content.trim_end_matches('='))
        .map_err(|e| Error::unexpected("base64url decode failed").with_source(e))
}

/// SHA256 digest.
pub fn sha256(content: &[u8]) -> Vec<u8> {
    Sha256::digest(content).to_vec()
}

/// SHA384 digest.
pub fn sha384(content: &[u8]) -> Vec<u8> {
    Sha384::digest(content).to_vec()
}

/// SHA512 digest.
pub fn sha512(content: &[u8]) -> Vec<u8> {
    Sha512::digest(content).to_vec()
}
