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

use crate::body::RequestBody;
use crate::context::Context;
use crate::retry::{CallOptions, RetryPolicy};
use crate::signer::Sign;
use crate::utils::body_preview;
use crate::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use log::Level;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-sign";

const JSON_MIME: &str = "application/json";

/// A successful response.
///
/// `body` is always the exact bytes received; `data` is whatever was
/// decoded from them.
#[derive(Debug, Clone)]
pub struct TransportResponse<T = ()> {
    /// HTTP status, always 2xx.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
    /// Decoded payload.
    pub data: T,
}

/// Transport signs, sends and retries requests.
///
/// Every attempt encodes the body, signs those exact bytes, and sends them.
/// Nothing is cached between attempts.
///
/// ## Example
///
/// ```no_run
/// use novapay_core::{CallOptions, Context, HashAlgorithm, Json, RetryPolicy, RsaSigner, Transport};
/// use http::Method;
/// use std::time::Duration;
///
/// # async fn example(key: rsa::RsaPrivateKey) -> novapay_core::Result<()> {
/// let transport = Transport::new(Context::new())
///     .with_signer(RsaSigner::new(HashAlgorithm::Sha256).with_private_key(key))
///     .with_retry(RetryPolicy::new(3, Duration::from_millis(300))?);
///
/// let resp = transport
///     .do_json::<_, serde_json::Value>(
///         Method::POST,
///         "https://api-qecom.novapay.ua/v1/get-status",
///         &Json(serde_json::json!({"session_id": "s-1"})),
///         &CallOptions::default(),
///     )
///     .await?;
/// println!("{}", resp.data);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transport {
    ctx: Context,
    signer: Option<Arc<dyn Sign>>,
    retry: RetryPolicy,
    default_headers: Vec<(String, String)>,
    log_bodies: bool,
}

impl Transport {
    /// Create a transport without signer, single attempt, no extra headers.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            signer: None,
            retry: RetryPolicy::default(),
            default_headers: Vec::new(),
            log_bodies: false,
        }
    }

    /// Sign every request with `signer`.
    pub fn with_signer(mut self, signer: impl Sign) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Sign every request with a shared signer.
    pub fn with_shared_signer(mut self, signer: Arc<dyn Sign>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Add headers to every request.
    ///
    /// Pairs are copied; pairs with an empty name or value are dropped.
    pub fn with_default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (k, v) in headers {
            let (k, v) = (k.as_ref(), v.as_ref());
            if k.is_empty() || v.is_empty() {
                continue;
            }
            self.default_headers.push((k.to_string(), v.to_string()));
        }
        self
    }

    /// Render full bodies in debug logs instead of their size.
    pub fn with_log_bodies(mut self, log_bodies: bool) -> Self {
        self.log_bodies = log_bodies;
        self
    }

    /// Context used by this transport.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Retry policy in use.
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Send a request and decode a 2xx JSON body into `T`.
    ///
    /// An empty 2xx body decodes as JSON `null`, which suits `()`,
    /// `Option<_>` and `serde_json::Value`.
    pub async fn do_json<B, T>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        opts: &CallOptions,
    ) -> Result<TransportResponse<T>>
    where
        B: RequestBody + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(method, url, body, opts, decode_json::<T>).await
    }

    /// Send a request and return the raw 2xx body without decoding it.
    pub async fn send<B>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        opts: &CallOptions,
    ) -> Result<TransportResponse>
    where
        B: RequestBody + ?Sized,
    {
        self.execute(method, url, body, opts, |_| Ok(())).await
    }

    async fn execute<B, T, F>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        opts: &CallOptions,
        decode: F,
    ) -> Result<TransportResponse<T>>
    where
        B: RequestBody + ?Sized,
        F: Fn(&Bytes) -> Result<T>,
    {
        let attempts = self.retry.attempts();
        let mut backoff = self.retry.backoff();
        let mut attempt = 1;

        loop {
            self.ctx.log(
                Level::Debug,
                format_args!(
                    "[NovaPay HTTP] request: method={method} url={url} attempt={attempt}/{attempts}"
                ),
            );

            let err = match self.attempt(&method, url, body, opts, &decode).await {
                Ok(resp) => {
                    if self.ctx.log_enabled(Level::Debug) {
                        self.ctx.log(
                            Level::Debug,
                            format_args!(
                                "[NovaPay HTTP] response: method={method} url={url} status={} response={}",
                                resp.status.as_u16(),
                                body_preview(&resp.body, self.log_bodies)
                            ),
                        );
                    }
                    return Ok(resp);
                }
                Err(err) => err,
            };

            let wait = match backoff.next() {
                Some(wait) if err.is_retryable() => wait,
                _ => {
                    self.log_failure(&method, url, &err);
                    return Err(err);
                }
            };

            self.ctx.log(
                Level::Warn,
                format_args!(
                    "[NovaPay HTTP] request retry: method={method} url={url} attempt={attempt} wait={wait:?} err={err}"
                ),
            );
            opts.sleep(wait).await?;
            attempt += 1;
        }
    }

    /// Run one attempt under a fresh request id, recording any error.
    async fn attempt<B, T, F>(
        &self,
        method: &Method,
        url: &str,
        body: &B,
        opts: &CallOptions,
        decode: &F,
    ) -> Result<TransportResponse<T>>
    where
        B: RequestBody + ?Sized,
        F: Fn(&Bytes) -> Result<T>,
    {
        let request_id = Uuid::new_v4().to_string();
        let res = self
            .attempt_once(&request_id, method, url, body, opts, decode)
            .await;
        if let Err(err) = &res {
            self.ctx.record_error(&request_id, err).await;
        }
        res
    }

    async fn attempt_once<B, T, F>(
        &self,
        request_id: &str,
        method: &Method,
        url: &str,
        body: &B,
        opts: &CallOptions,
        decode: &F,
    ) -> Result<TransportResponse<T>>
    where
        B: RequestBody + ?Sized,
        F: Fn(&Bytes) -> Result<T>,
    {
        opts.check()?;

        let body = body.canonical_body()?;
        let req = self.build_request(method.clone(), url, body)?;
        let sent = req.body().clone();

        if self.ctx.log_enabled(Level::Debug) {
            self.ctx.log(
                Level::Debug,
                format_args!(
                    "[NovaPay HTTP] request prepared: request_id={request_id} method={method} url={url} payload={}",
                    body_preview(&sent, self.log_bodies)
                ),
            );
        }
        self.ctx.record_request(request_id, &sent).await;

        let resp = opts.guard(self.ctx.http_send(req)).await?;
        let (parts, raw) = resp.into_parts();
        self.ctx.record_response(request_id, &raw).await;

        if self.ctx.log_enabled(Level::Debug) {
            self.ctx.log(
                Level::Debug,
                format_args!(
                    "[NovaPay HTTP] response received: request_id={request_id} method={method} url={url} status={} response={}",
                    parts.status.as_u16(),
                    body_preview(&raw, self.log_bodies)
                ),
            );
        }

        if !parts.status.is_success() {
            return Err(Error::status_code(parts.status, raw));
        }

        let data = decode(&raw).map_err(|err| err.with_response(parts.status, raw.clone()))?;
        Ok(TransportResponse {
            status: parts.status,
            headers: parts.headers,
            body: raw,
            data,
        })
    }

    /// Build a signed request around an already canonical body.
    ///
    /// `None` sends no body and no `Content-Type`, but is still signed as
    /// zero bytes.
    pub fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<http::Request<Bytes>> {
        let has_body = body.is_some();
        let mut req = http::Request::builder()
            .method(method)
            .uri(url)
            .body(body.unwrap_or_default())?;

        let headers = req.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        }
        for (k, v) in &self.default_headers {
            headers.insert(HeaderName::from_bytes(k.as_bytes())?, HeaderValue::from_str(v)?);
        }

        if let Some(signer) = &self.signer {
            let sig = signer.sign(req.body())?;
            req.headers_mut().insert(
                HeaderName::from_static(SIGNATURE_HEADER),
                HeaderValue::from_str(&sig)?,
            );
        }

        Ok(req)
    }

    fn log_failure(&self, method: &Method, url: &str, err: &Error) {
        if !self.ctx.log_enabled(Level::Error) {
            return;
        }
        match (err.status(), err.body()) {
            (Some(status), Some(body)) => self.ctx.log(
                Level::Error,
                format_args!(
                    "[NovaPay HTTP] request failed: method={method} url={url} status={} err={err} response={}",
                    status.as_u16(),
                    body_preview(body, self.log_bodies)
                ),
            ),
            _ => self.ctx.log(
                Level::Error,
                format_args!("[NovaPay HTTP] request failed: method={method} url={url} err={err}"),
            ),
        }
    }
}

fn decode_json<T: DeserializeOwned>(raw: &Bytes) -> Result<T> {
    let input: &[u8] = if raw.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        raw
    };
    serde_json::from_slice(input)
        .map_err(|e| Error::decode(format!("decode json response: {e}")).with_source(e))
}
