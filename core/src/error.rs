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

use bytes::Bytes;
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for key vault cryptography operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    body: Option<Bytes>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied input is empty or malformed (algorithm, key id, ...)
    Validation,

    /// The algorithm is known but the local provider can't run it
    UnsupportedAlgorithm,

    /// The service answered with a non-success status
    Service,

    /// Connection-level failure reported by the transport
    Transport,

    /// Credentials are missing or invalid
    CredentialInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (malformed responses, crypto backend failures, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status returned by the service, only set for [`ErrorKind::Service`].
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Raw response body returned by the service, only set for [`ErrorKind::Service`].
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Check if this error may succeed when the same request is sent again.
    ///
    /// Validation and algorithm errors are never retryable. Transport errors
    /// always are, service errors only for throttling, timeouts and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::Transport => true,
            ErrorKind::Service => self.status.is_some_and(|s| {
                s == StatusCode::REQUEST_TIMEOUT
                    || s == StatusCode::TOO_MANY_REQUESTS
                    || s.is_server_error()
            }),
            _ => false,
        }
    }
}

// Convenience constructors
impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedAlgorithm, message)
    }

    /// Create a service error carrying the response status and body
    pub fn service(status: StatusCode, body: Bytes) -> Self {
        let message = format!(
            "service responded with {status}: {}",
            String::from_utf8_lossy(&body)
        );
        Self {
            status: Some(status),
            body: Some(body),
            ..Self::new(ErrorKind::Service, message)
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "invalid input"),
            ErrorKind::UnsupportedAlgorithm => write!(f, "unsupported algorithm"),
            ErrorKind::Service => write!(f, "service error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::validation(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusCode::TOO_MANY_REQUESTS, true; "throttled")]
    #[test_case(StatusCode::REQUEST_TIMEOUT, true; "timeout")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE, true; "unavailable")]
    #[test_case(StatusCode::FORBIDDEN, false; "forbidden")]
    #[test_case(StatusCode::BAD_REQUEST, false; "bad request")]
    fn test_service_error_retryable(status: StatusCode, expected: bool) {
        let err = Error::service(status, Bytes::from_static(b"{}"));
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.is_retryable(), expected);
    }

    #[test]
    fn test_algorithm_errors_never_retryable() {
        assert!(!Error::unsupported_algorithm("A256KW").is_retryable());
        assert!(!Error::validation("empty algorithm").is_retryable());
        assert!(Error::transport("connection reset").is_retryable());
    }

    #[test]
    fn test_service_error_keeps_body() {
        let err = Error::service(
            StatusCode::FORBIDDEN,
            Bytes::from_static(br#"{"error":{"code":"Forbidden"}}"#),
        );
        assert_eq!(
            err.body().map(|b| b.as_ref()),
            Some(br#"{"error":{"code":"Forbidden"}}"#.as_ref())
        );
        assert!(err.to_string().contains("403"));
    }
}
