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

//! Core components for talking to the NovaPay APIs.
//!
//! This crate provides the signed transport every NovaPay API call goes
//! through, and the abstractions it is built on.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Canonical body**: the exact bytes that are both signed and sent, see [`body`]
//! - **Signer**: RSA PKCS#1 v1.5 over SHA-256 or SHA-1, producing the `x-sign` header, see [`RsaSigner`]
//! - **Transport**: builds, signs, sends and retries requests, see [`Transport`]
//! - **Context**: a container holding the HTTP sender, logger and recorder, see [`Context`]
//!
//! ## Example
//!
//! ```no_run
//! use novapay_core::{CallOptions, Context, HashAlgorithm, Json, RetryPolicy, RsaSigner, Transport};
//! use novapay_core::key::parse_rsa_private_key_pem;
//! use http::Method;
//! use std::time::Duration;
//!
//! # async fn example(pem: &[u8], ctx: Context) -> novapay_core::Result<()> {
//! let signer = RsaSigner::new(HashAlgorithm::Sha256)
//!     .with_private_key(parse_rsa_private_key_pem(pem)?);
//!
//! let transport = Transport::new(ctx)
//!     .with_signer(signer)
//!     .with_retry(RetryPolicy::new(3, Duration::from_millis(300))?);
//!
//! let resp = transport
//!     .send(
//!         Method::POST,
//!         "https://api-qecom.novapay.ua/v1/expire",
//!         &Json(serde_json::json!({"merchant_id": "1", "session_id": "2"})),
//!         &CallOptions::default(),
//!     )
//!     .await?;
//! println!("{}", resp.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! This crate defines several important traits:
//!
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Logger`]: For receiving transport log lines
//! - [`Recorder`]: For observing request and response bodies
//! - [`Sign`]: For producing the `x-sign` header
//! - [`RequestBody`]: For turning values into canonical bodies
//!
//! ## Utilities
//!
//! The crate also provides utility modules:
//!
//! - [`hash`]: Digest and base64 utilities
//! - [`key`]: PEM key parsing
//! - [`utils`]: General utilities including data redaction and body previews

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod body;
pub use body::{encode, Json, RequestBody};
pub mod hash;
pub use hash::HashAlgorithm;
pub mod key;
pub mod utils;

mod context;
pub use context::{Context, HttpSend, NoopHttpSend};
mod logger;
pub use logger::{Logger, NoopLogger, StdLogger, LOG_TARGET};
mod recorder;
pub use recorder::{NoopRecorder, Recorder};
mod retry;
pub use retry::{Backoff, CallOptions, RetryPolicy, DEFAULT_ATTEMPTS, DEFAULT_WAIT};
mod signer;
pub use signer::{RsaSigner, Sign};
mod transport;
pub use transport::{Transport, TransportResponse, SIGNATURE_HEADER};

mod error;
pub use error::{Error, ErrorKind, Result, VerifyFailure};
