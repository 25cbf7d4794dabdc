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

//! reqwest based [`HttpSend`] for novapay-core.
//!
//! ```no_run
//! use novapay_core::Context;
//! use novapay_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use novapay_core::{Error, HttpSend, Result};
use reqwest::{Client, Request};
use std::time::Duration;

/// Timeout applied by [`ReqwestHttpSend::default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
///
/// Connection, timeout, DNS and body read failures all surface as
/// transport errors so the caller's retry policy can act on them.
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
    timeout: Option<Duration>,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// Timeouts are whatever `client` was built with.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Create a new ReqwestHttpSend that gives up on a request after `timeout`.
    ///
    /// The timeout is set on every request, so it holds for any client.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Client::new()).with_request_timeout(timeout)
    }

    /// Set the per request timeout, overriding the client's own.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Per request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let mut req = Request::try_from(req).map_err(|e| {
            Error::request_invalid(format!("build request: {e}")).with_source(e)
        })?;
        if let Some(timeout) = self.timeout {
            *req.timeout_mut() = Some(timeout);
        }
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(format!("send request: {e}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport(format!("read response body: {e}")).with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
