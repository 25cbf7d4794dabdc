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

/// Only this many bytes of a response body are rendered into a status error message.
const STATUS_BODY_PREVIEW: usize = 512;

/// The error type for novapay operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
    status: Option<StatusCode>,
    body: Option<Bytes>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request value cannot be serialized into a canonical body
    Encode,

    /// Signing primitive failed
    Sign,

    /// Signature verification failed
    Verify(VerifyFailure),

    /// Configuration error (missing keys, unsupported hash, invalid values)
    ConfigInvalid,

    /// Request cannot be built (invalid url, header, or failed validation)
    RequestInvalid,

    /// Server answered with a non-2xx status
    Status,

    /// Network level failure: connection, timeout, DNS, body read
    Transport,

    /// 2xx response body does not match the expected shape
    Decode,

    /// Call was cancelled by the caller
    Cancelled,

    /// Call deadline passed
    DeadlineExceeded,
}

/// Why a signature did not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    /// Signature is empty after trimming whitespace.
    EmptySignature,
    /// Signature is neither padded nor unpadded standard base64.
    MalformedSignature,
    /// Signature decoded but does not match the body.
    Mismatch,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            status: None,
            body: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the response status and raw body this error was produced from.
    pub fn with_response(mut self, status: StatusCode, body: Bytes) -> Self {
        self.status = Some(status);
        self.body = Some(body);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of the response, if the error was produced after one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Full raw response body, if the error was produced after one was received.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Check if this is a signature verification error
    pub fn is_verify_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Verify(_))
    }

    /// Check if the call that produced this error may be attempted again.
    ///
    /// - cancellation and deadline are never retried
    /// - status errors are retried for 429 and 5xx except 501
    /// - transport errors are retried
    /// - everything else is deterministic and never retried
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::Cancelled | ErrorKind::DeadlineExceeded => false,
            ErrorKind::Status => match self.status {
                Some(status) => {
                    status == StatusCode::TOO_MANY_REQUESTS
                        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
                }
                None => false,
            },
            ErrorKind::Transport => true,
            ErrorKind::Encode
            | ErrorKind::Sign
            | ErrorKind::Verify(_)
            | ErrorKind::ConfigInvalid
            | ErrorKind::RequestInvalid
            | ErrorKind::Decode => false,
        }
    }
}

// Convenience constructors
impl Error {
    /// Create an encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encode, message)
    }

    /// Create a sign error
    pub fn sign(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Sign, message)
    }

    /// Create a verify error
    pub fn verify(failure: VerifyFailure, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Verify(failure), message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a status error for a non-2xx response.
    ///
    /// The full body is kept on the error, the message only shows its head.
    pub fn status_code(status: StatusCode, body: Bytes) -> Self {
        let message = if body.is_empty() {
            format!("unexpected status: {}", status.as_u16())
        } else {
            let head = &body[..body.len().min(STATUS_BODY_PREVIEW)];
            format!(
                "unexpected status: {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(head)
            )
        };
        Self::new(ErrorKind::Status, message).with_response(status, body)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Create a cancelled error
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "call cancelled")
    }

    /// Create a deadline exceeded error
    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::DeadlineExceeded, "call deadline exceeded")
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Encode => write!(f, "encode failed"),
            ErrorKind::Sign => write!(f, "sign failed"),
            ErrorKind::Verify(VerifyFailure::EmptySignature) => write!(f, "empty signature"),
            ErrorKind::Verify(VerifyFailure::MalformedSignature) => {
                write!(f, "malformed signature")
            }
            ErrorKind::Verify(VerifyFailure::Mismatch) => write!(f, "signature mismatch"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Status => write!(f, "unexpected status"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Decode => write!(f, "decode failed"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(500, true; "internal server error")]
    #[test_case(502, true; "bad gateway")]
    #[test_case(503, true; "service unavailable")]
    #[test_case(501, false; "not implemented")]
    #[test_case(429, true; "too many requests")]
    #[test_case(400, false; "bad request")]
    #[test_case(404, false; "not found")]
    #[test_case(409, false; "conflict")]
    fn test_status_retryable(code: u16, expected: bool) {
        let status = StatusCode::from_u16(code).unwrap();
        let err = Error::status_code(status, Bytes::new());
        assert_eq!(err.is_retryable(), expected, "status {code}");
    }

    #[test]
    fn test_kind_retryable() {
        assert!(Error::transport("connection refused").is_retryable());
        assert!(!Error::cancelled().is_retryable());
        assert!(!Error::deadline_exceeded().is_retryable());
        assert!(!Error::encode("cycle").is_retryable());
        assert!(!Error::sign("boom").is_retryable());
        assert!(!Error::decode("bad json").is_retryable());
        assert!(!Error::config_invalid("no key").is_retryable());
        assert!(!Error::verify(VerifyFailure::Mismatch, "x").is_retryable());
        // A status kind without a recorded status is not something we can reason about.
        assert!(!Error::new(ErrorKind::Status, "status").is_retryable());
    }

    #[test]
    fn test_status_message() {
        let err = Error::status_code(StatusCode::BAD_GATEWAY, Bytes::new());
        assert_eq!(err.to_string(), "unexpected status: 502");

        let err = Error::status_code(StatusCode::BAD_REQUEST, Bytes::from_static(b"{\"e\":1}"));
        assert_eq!(err.to_string(), "unexpected status: 400: {\"e\":1}");

        let long = Bytes::from(vec![b'a'; 1000]);
        let err = Error::status_code(StatusCode::INTERNAL_SERVER_ERROR, long.clone());
        assert_eq!(
            err.to_string(),
            format!("unexpected status: 500: {}", "a".repeat(512))
        );
        assert_eq!(err.body(), Some(&long));
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
