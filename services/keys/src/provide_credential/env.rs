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

use async_trait::async_trait;
use keyvault_crypto_core::{AccessToken, Context, ProvideCredential, Result};
use log::debug;

use crate::constants::AZURE_KEYVAULT_ACCESS_TOKEN;

/// EnvCredentialProvider loads an access token from [`AZURE_KEYVAULT_ACCESS_TOKEN`].
///
/// Returns `None` when the env is unset or empty.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider;

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = AccessToken;

    async fn provide_credential(&self, ctx: &Context, scope: &str) -> Result<Option<Self::Credential>> {
        match ctx.env_var(AZURE_KEYVAULT_ACCESS_TOKEN) {
            Some(token) if !token.is_empty() => {
                debug!("loaded access token for scope {scope} from env");
                Ok(Some(AccessToken::new(token, None)))
            }
            _ => Ok(None),
        }
    }
}
