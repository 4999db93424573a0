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
use keyvault_crypto_core::time::DateTime;
use keyvault_crypto_core::{AccessToken, Context, ProvideCredential, Result};

/// StaticCredentialProvider hands out the same access token for every scope.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    token: AccessToken,
}

impl StaticCredentialProvider {
    /// Create a provider for a token that never expires.
    pub fn new(token: &str) -> Self {
        Self {
            token: AccessToken::new(token, None),
        }
    }

    /// Set the expiry of the token.
    pub fn with_expires_on(mut self, expires_on: DateTime) -> Self {
        self.token.expires_on = Some(expires_on);
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = AccessToken;

    async fn provide_credential(&self, _: &Context, _: &str) -> Result<Option<Self::Credential>> {
        Ok(Some(self.token.clone()))
    }
}
