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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Path segments of the key operations.
pub const ENCRYPT: &str = "encrypt";
pub const DECRYPT: &str = "decrypt";
pub const SIGN: &str = "sign";
pub const VERIFY: &str = "verify";
pub const WRAP_KEY: &str = "wrapKey";
pub const UNWRAP_KEY: &str = "unwrapKey";

pub const KEYS_COLLECTION: &str = "keys";
pub const API_VERSION: &str = "api-version";
pub const DEFAULT_API_VERSION: &str = "7.5";
pub const DEFAULT_SCOPE_SUFFIX: &str = "/.default";
pub const APPLICATION_JSON: &str = "application/json";

// Env values used by the key vault clients.
pub const AZURE_KEYVAULT_API_VERSION: &str = "AZURE_KEYVAULT_API_VERSION";
pub const AZURE_KEYVAULT_SCOPE: &str = "AZURE_KEYVAULT_SCOPE";
pub const AZURE_KEYVAULT_FORCE_REMOTE: &str = "AZURE_KEYVAULT_FORCE_REMOTE";
pub const AZURE_KEYVAULT_ACCESS_TOKEN: &str = "AZURE_KEYVAULT_ACCESS_TOKEN";

/// AsciiSet for a single path segment such as a key name or version.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
