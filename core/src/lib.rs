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

//! Core components for key vault cryptography clients.
//!
//! This crate provides the collaborator seams the cryptography clients are
//! built on. It doesn't know anything about keys or algorithms.
//!
//! ## Overview
//!
//! - **Context**: holds the [`HttpSend`] transport and the [`Env`] used for configuration
//! - **Traits**: [`ProvideCredential`] loads a bearer token for a scope, [`SignRequest`]
//!   attaches it to a request
//! - **Signer**: caches the credential and signs every outgoing request
//! - **Error**: a single [`Error`] type whose [`ErrorKind`] separates caller
//!   mistakes, unsupported algorithms, service and transport failures
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use keyvault_crypto_core::{AccessToken, Context, ProvideCredential, Result};
//!
//! #[derive(Debug)]
//! struct MyTokenSource;
//!
//! #[async_trait]
//! impl ProvideCredential for MyTokenSource {
//!     type Credential = AccessToken;
//!
//!     async fn provide_credential(
//!         &self,
//!         _: &Context,
//!         scope: &str,
//!     ) -> Result<Option<AccessToken>> {
//!         Ok(Some(AccessToken::new(format!("token-for-{scope}"), None)))
//!     }
//! }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: base64url codec and SHA-2 digests
//! - [`time`]: time helpers
//! - [`utils`]: data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod credential;
pub use credential::AccessToken;
mod signer;
pub use signer::Signer;
