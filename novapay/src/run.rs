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

//! Per call options.

use http::Method;
use novapay_core::utils::pretty_json;
use novapay_core::{CallOptions, Context};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Receives a request that a dry run skipped: method, full url and the
/// canonical body, if the request has one.
pub type DryRunHandler = Arc<dyn Fn(&Method, &str, Option<&[u8]>) + Send + Sync>;

#[derive(Clone)]
enum DryRun {
    Log,
    Handler(DryRunHandler),
}

/// RunOptions controls a single API call.
///
/// ```
/// use novapay::RunOptions;
/// use std::time::Duration;
///
/// let opts = RunOptions::new()
///     .with_timeout(Duration::from_secs(10))
///     .dry_run();
/// assert!(opts.is_dry_run());
/// ```
#[derive(Clone, Default)]
pub struct RunOptions {
    call: CallOptions,
    dry_run: Option<DryRun>,
}

impl Debug for RunOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let dry_run = match &self.dry_run {
            None => "off",
            Some(DryRun::Log) => "log",
            Some(DryRun::Handler(_)) => "handler",
        };
        f.debug_struct("RunOptions")
            .field("call", &self.call)
            .field("dry_run", &dry_run)
            .finish()
    }
}

impl From<CallOptions> for RunOptions {
    fn from(call: CallOptions) -> Self {
        Self {
            call,
            dry_run: None,
        }
    }
}

impl RunOptions {
    /// Create empty options: no dry run, no cancellation, no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the HTTP call and log the request through the client's logger.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = Some(DryRun::Log);
        self
    }

    /// Skip the HTTP call and hand the request to `handler`.
    pub fn dry_run_with<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Method, &str, Option<&[u8]>) + Send + Sync + 'static,
    {
        self.dry_run = Some(DryRun::Handler(Arc::new(handler)));
        self
    }

    /// Abort the call once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.call = self.call.with_cancel(token);
        self
    }

    /// Abort the call once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.call = self.call.with_deadline(deadline);
        self
    }

    /// Abort the call after `timeout`, counted from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call = self.call.with_timeout(timeout);
        self
    }

    /// Options handed to the transport.
    pub fn call_options(&self) -> &CallOptions {
        &self.call
    }

    /// Check whether this call is a dry run.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run.is_some()
    }

    /// Run the dry run hook if this call is a dry run.
    ///
    /// Returns `true` when the request must be skipped.
    pub(crate) fn handle_dry_run(
        &self,
        ctx: &Context,
        method: &Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> bool {
        match &self.dry_run {
            None => false,
            Some(DryRun::Handler(handler)) => {
                handler(method, url, body);
                true
            }
            Some(DryRun::Log) => {
                log_dry_run(ctx, method, url, body);
                true
            }
        }
    }
}

fn log_dry_run(ctx: &Context, method: &Method, url: &str, body: Option<&[u8]>) {
    ctx.log(
        log::Level::Info,
        format_args!("Dry run: skipping request {method} {url}"),
    );
    match body {
        None => ctx.log(log::Level::Info, format_args!("Dry run payload: <nil>")),
        Some(body) => {
            let payload = pretty_json(body)
                .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
            ctx.log(
                log::Level::Info,
                format_args!("Dry run payload:\n{payload}"),
            );
        }
    }
}
