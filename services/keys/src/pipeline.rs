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

use bytes::Bytes;
use http::{header, Method, Request};
use keyvault_crypto_core::{AccessToken, Context, Error, ProvideCredential, Result, Signer};
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::*;
use crate::sign_request::RequestSigner;

/// Pipeline sends authorized JSON requests to a vault.
///
/// One pipeline is shared by a [`crate::KeyClient`] and every
/// [`crate::CryptographyClient`] it creates. It doesn't retry: retry policies
/// belong to the [`keyvault_crypto_core::HttpSend`] in the context.
#[derive(Clone)]
pub(crate) struct Pipeline {
    ctx: Context,
    signer: Signer<AccessToken>,
    api_version: String,
}

impl Debug for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("scope", &self.signer.scope())
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        ctx: Context,
        scope: String,
        api_version: &str,
        credential: impl ProvideCredential<Credential = AccessToken>,
    ) -> Self {
        let signer = Signer::new(ctx.clone(), scope, credential, RequestSigner);
        Self {
            ctx,
            signer,
            api_version: api_version.to_string(),
        }
    }

    /// `{key_id}/{operation}?api-version=…`
    pub fn operation_url(&self, key_id: &str, operation: &str) -> String {
        format!(
            "{}/{operation}?{}",
            key_id.trim_end_matches('/'),
            self.query()
        )
    }

    /// `{vault_url}/keys/{name}[/{version}]?api-version=…`
    pub fn key_url(&self, vault_url: &str, name: &str, version: Option<&str>) -> String {
        format!("{}?{}", key_id(vault_url, name, version), self.query())
    }

    /// `{key_id}?api-version=…`, used to fetch key material.
    pub fn key_id_url(&self, key_id: &str) -> String {
        format!("{}?{}", key_id.trim_end_matches('/'), self.query())
    }

    fn query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(API_VERSION, &self.api_version)
            .finish()
    }

    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let body = self.send(Method::GET, url, None).await?;
        parse_json(&body)
    }

    pub async fn post_json<T: Serialize, R: DeserializeOwned>(&self, url: &str, body: &T) -> Result<R> {
        let body = serde_json::to_vec(body)
            .map_err(|e| Error::unexpected("failed to serialize request body").with_source(e))?;
        let body = self.send(Method::POST, url, Some(body)).await?;
        parse_json(&body)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// Any non-2xx status becomes a service error carrying status and body.
    pub async fn send(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        let mut req = Request::builder()
            .method(method)
            .uri(url)
            .header(header::ACCEPT, APPLICATION_JSON);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, APPLICATION_JSON);
        }
        let req = req.body(body.map(Bytes::from).unwrap_or_default())?;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;
        debug!("sending key vault request: {} {}", parts.method, parts.uri);

        let resp = self.ctx.http_send(Request::from_parts(parts, body)).await?;
        let status = resp.status();
        debug!("key vault responded with status {status}");

        if !status.is_success() {
            return Err(Error::service(status, resp.into_body()));
        }
        Ok(resp.into_body())
    }
}

/// Percent-encode a single path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, &PATH_SEGMENT_ENCODE_SET).to_string()
}

/// `{vault_url}/keys/{name}[/{version}]` with name and version percent-encoded.
pub(crate) fn key_id(vault_url: &str, name: &str, version: Option<&str>) -> String {
    let mut id = format!(
        "{}/{KEYS_COLLECTION}/{}",
        vault_url.trim_end_matches('/'),
        encode_segment(name)
    );
    if let Some(version) = version.filter(|v| !v.is_empty()) {
        id.push('/');
        id.push_str(&encode_segment(version));
    }
    id
}

fn parse_json<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body)
        .map_err(|e| Error::unexpected("failed to parse key vault response").with_source(e))
}
