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

use crate::logger::{Logger, NoopLogger};
use crate::recorder::{NoopRecorder, Recorder};
use crate::{Error, Result};
use bytes::Bytes;
use log::{Level, LevelFilter};
use std::fmt::{Arguments, Debug};
use std::sync::Arc;

/// Context holds the collaborators used by the transport.
///
/// ## Important
///
/// novapay-core provides NO network implementation. Users MUST configure an
/// [`HttpSend`] to make calls; any unconfigured component uses a no-op
/// implementation that returns errors or discards events.
///
/// ## Example
///
/// ```
/// use novapay_core::{Context, StdLogger};
///
/// let ctx = Context::new().with_logger(StdLogger::default());
/// ```
#[derive(Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    logger: Arc<dyn Logger>,
    recorder: Arc<dyn Recorder>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("http", &self.http)
            .field("logger", &self.logger)
            .field("recorder", &self.recorder)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with no-op implementations.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
            logger: Arc::new(NoopLogger),
            recorder: Arc::new(NoopRecorder),
        }
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the logger implementation.
    pub fn with_logger(mut self, logger: impl Logger) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Replace the logger with a shared instance.
    pub fn with_shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the recorder implementation.
    pub fn with_recorder(mut self, recorder: impl Recorder) -> Self {
        self.recorder = Arc::new(recorder);
        self
    }

    /// Replace the recorder with a shared instance.
    pub fn with_shared_recorder(mut self, recorder: Arc<dyn Recorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Send http request and return the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Write a log record if the logger accepts `level`.
    #[inline]
    pub fn log(&self, level: Level, args: Arguments<'_>) {
        if self.logger.enabled(level) {
            self.logger.log(level, args);
        }
    }

    /// Whether the logger accepts `level`.
    #[inline]
    pub fn log_enabled(&self, level: Level) -> bool {
        self.logger.enabled(level)
    }

    /// Change the logger level, if the logger supports it.
    pub fn set_log_level(&self, level: LevelFilter) {
        self.logger.set_level(level);
    }

    /// Record an outgoing body. Failures are logged and dropped.
    pub async fn record_request(&self, request_id: &str, body: &[u8]) {
        if let Err(err) = self.recorder.record_request(request_id, body).await {
            self.log(
                Level::Warn,
                format_args!("[NovaPay HTTP] cannot record request: {err}"),
            );
        }
    }

    /// Record a received body. Failures are logged and dropped.
    pub async fn record_response(&self, request_id: &str, body: &[u8]) {
        if let Err(err) = self.recorder.record_response(request_id, body).await {
            self.log(
                Level::Warn,
                format_args!("[NovaPay HTTP] cannot record response: {err}"),
            );
        }
    }

    /// Record an error. Failures are logged and dropped.
    pub async fn record_error(&self, request_id: &str, err: &Error) {
        if let Err(rec_err) = self.recorder.record_error(request_id, err).await {
            self.log(
                Level::Warn,
                format_args!("[NovaPay HTTP] cannot record error: {rec_err}"),
            );
        }
    }
}

/// HttpSend is used to perform one HTTP round trip.
///
/// Implementations must map every network level failure (connection,
/// timeout, DNS, body read) to [`ErrorKind::Transport`](crate::ErrorKind::Transport)
/// and must not retry on their own.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response with its body fully read.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::config_invalid(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
