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

use crate::{Error, Result};
use std::fmt::Debug;

/// Recorder observes request bodies, response bodies and errors.
///
/// Every event of one attempt carries the same request id. A recorder can
/// not influence the call: failures are logged and dropped.
#[async_trait::async_trait]
pub trait Recorder: Debug + Send + Sync + 'static {
    /// Record the canonical body about to be sent.
    async fn record_request(&self, request_id: &str, body: &[u8]) -> Result<()>;

    /// Record the raw body received.
    async fn record_response(&self, request_id: &str, body: &[u8]) -> Result<()>;

    /// Record an error raised at any stage of the attempt.
    async fn record_error(&self, request_id: &str, err: &Error) -> Result<()>;
}

/// NoopRecorder records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

#[async_trait::async_trait]
impl Recorder for NoopRecorder {
    async fn record_request(&self, _request_id: &str, _body: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn record_response(&self, _request_id: &str, _body: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn record_error(&self, _request_id: &str, _err: &Error) -> Result<()> {
        Ok(())
    }
}
