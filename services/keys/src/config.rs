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

use http::Uri;
use keyvault_crypto_core::{Context, Error, Result};

use crate::constants::*;

/// Config carries all the configuration for the key vault clients.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// `api_version` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AZURE_KEYVAULT_API_VERSION`
    /// - default to `7.5`
    pub api_version: Option<String>,
    /// `scope` of the bearer token will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AZURE_KEYVAULT_SCOPE`
    /// - derived from the vault url, `https://myvault.vault.azure.net` maps to
    ///   `https://vault.azure.net/.default`
    pub scope: Option<String>,
    /// Always execute operations on the service, even when the key material
    /// is available locally.
    ///
    /// Set to true by env value `AZURE_KEYVAULT_FORCE_REMOTE` of `true` or `1`.
    pub force_remote: bool,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(AZURE_KEYVAULT_API_VERSION) {
            self.api_version.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AZURE_KEYVAULT_SCOPE) {
            self.scope.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AZURE_KEYVAULT_FORCE_REMOTE) {
            if v.eq_ignore_ascii_case("true") || v == "1" {
                self.force_remote = true;
            }
        }
        self
    }

    /// The api version to send, falling back to the default one.
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// The token scope for `url`, preferring the configured one.
    pub fn scope_for(&self, url: &str) -> Result<String> {
        match &self.scope {
            Some(scope) => Ok(scope.clone()),
            None => scope_from_url(url),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_version.as_deref() == Some("") {
            return Err(Error::config_invalid("api_version can not be empty"));
        }
        if self.scope.as_deref() == Some("") {
            return Err(Error::config_invalid("scope can not be empty"));
        }
        Ok(())
    }
}

/// Derive the token scope from a vault or key url.
///
/// The first label of the host is the vault name and is dropped. A host
/// without a dot is used as is.
pub fn scope_from_url(url: &str) -> Result<String> {
    let uri: Uri = url
        .parse()
        .map_err(|e| Error::validation(format!("invalid vault url: {url}")).with_source(e))?;
    let scheme = uri.scheme_str().unwrap_or("https");
    let host = uri
        .host()
        .ok_or_else(|| Error::validation(format!("vault url has no host: {url}")))?;

    let resource = match host.split_once('.') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => host,
    };
    Ok(format!("{scheme}://{resource}{DEFAULT_SCOPE_SUFFIX}"))
}
