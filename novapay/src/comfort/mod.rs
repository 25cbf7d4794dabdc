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

//! Comfort API: payouts to recipients.
//!
//! Every call needs a comfort merchant id on the client; without one it
//! fails with a config error before anything is sent.

mod types;
pub use types::*;

use crate::client::{Api, Client};
use crate::constants::*;
use crate::run::RunOptions;
use crate::validate::Validate;
use http::Method;
use novapay_core::{Json, RequestBody, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Comfort endpoints of a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Comfort<'a> {
    client: &'a Client,
}

impl<'a> Comfort<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create payouts.
    pub async fn create_operations(
        &self,
        req: &CreateOperationsRequest,
        opts: &RunOptions,
    ) -> Result<Option<Vec<CreateOperationsResponseItem>>> {
        self.client.ensure_comfort_ready()?;
        req.validate()?;
        self.post(COMFORT_CREATE_OPERATIONS_PATH, req, opts).await
    }

    /// Refund payouts by public id, returning the ids accepted for refund.
    pub async fn refund_operations(
        &self,
        req: &RefundOperationsRequest,
        opts: &RunOptions,
    ) -> Result<Option<Vec<String>>> {
        self.client.ensure_comfort_ready()?;
        req.validate()?;
        self.post(COMFORT_REFUND_OPERATIONS_PATH, req, opts).await
    }

    /// Get the status of an operation.
    ///
    /// `None` sends an empty request object.
    pub async fn operations_status(
        &self,
        req: Option<&OperationsStatusRequest>,
        opts: &RunOptions,
    ) -> Result<Option<OperationsStatusResponse>> {
        self.client.ensure_comfort_ready()?;
        let empty = OperationsStatusRequest::default();
        self.post(COMFORT_OPERATIONS_STATUS_PATH, req.unwrap_or(&empty), opts)
            .await
    }

    /// Change the recipient of a pending payout.
    pub async fn change_recipient_data(
        &self,
        req: &ChangeRecipientDataRequest,
        opts: &RunOptions,
    ) -> Result<()> {
        self.client.ensure_comfort_ready()?;
        req.validate()?;
        self.client
            .call_raw(
                Api::Comfort,
                Method::POST,
                COMFORT_CHANGE_RECIPIENT_DATA_PATH,
                Some(&Json(req)),
                opts,
            )
            .await
            .map(|_| ())
    }

    /// Get the merchant balance. Sent as a `GET` without a body.
    pub async fn balance(&self, opts: &RunOptions) -> Result<Option<BalanceResponse>> {
        self.client
            .call_json::<(), _>(Api::Comfort, Method::GET, COMFORT_BALANCE_PATH, None, opts)
            .await
    }

    /// Request an export of operations, delivered by email.
    pub async fn export_operations(
        &self,
        req: &ExportOperationsRequest,
        opts: &RunOptions,
    ) -> Result<Option<ExportOperationsResponse>> {
        self.client.ensure_comfort_ready()?;
        req.validate()?;
        self.post(COMFORT_EXPORT_OPERATIONS_PATH, req, opts).await
    }

    /// Call a Comfort endpoint that has no typed method.
    pub async fn call<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: &RunOptions,
    ) -> Result<Option<T>>
    where
        B: RequestBody + ?Sized,
        T: DeserializeOwned,
    {
        self.client
            .call_json(Api::Comfort, method, path, body, opts)
            .await
    }

    async fn post<B, T>(&self, path: &str, body: &B, opts: &RunOptions) -> Result<Option<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.client
            .call_json(Api::Comfort, Method::POST, path, Some(&Json(body)), opts)
            .await
    }
}
