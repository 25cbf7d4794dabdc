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

//! Acquiring API: payment sessions, holds and delivery.

mod types;
pub use types::*;

use crate::client::{Api, Client};
use crate::constants::*;
use crate::run::RunOptions;
use crate::validate::Validate;
use bytes::Bytes;
use http::Method;
use novapay_core::{Json, RequestBody, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Acquiring endpoints of a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Acquiring<'a> {
    client: &'a Client,
}

impl<'a> Acquiring<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a payment session.
    pub async fn create_session(
        &self,
        req: &CreateSessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<CreateSessionResponse>> {
        req.validate()?;
        self.post(ACQUIRING_CREATE_SESSION_PATH, req, opts).await
    }

    /// Attach an order to a session and get the payment url.
    pub async fn add_payment(
        &self,
        req: &AddPaymentRequest,
        opts: &RunOptions,
    ) -> Result<Option<AddPaymentResponse>> {
        req.validate()?;
        self.post(ACQUIRING_ADD_PAYMENT_PATH, req, opts).await
    }

    /// Void a session, releasing held funds or refunding a payment.
    pub async fn void_session(&self, req: &SessionRequest, opts: &RunOptions) -> Result<()> {
        req.validate()?;
        self.post_unit(ACQUIRING_VOID_SESSION_PATH, req, opts).await
    }

    /// Confirm held funds, fully or partially.
    pub async fn complete_hold(&self, req: &CompleteHoldRequest, opts: &RunOptions) -> Result<()> {
        req.validate()?;
        self.post_unit(ACQUIRING_COMPLETE_HOLD_PATH, req, opts).await
    }

    /// Expire a session right away.
    pub async fn expire_session(&self, req: &SessionRequest, opts: &RunOptions) -> Result<()> {
        req.validate()?;
        self.post_unit(ACQUIRING_EXPIRE_SESSION_PATH, req, opts).await
    }

    /// Confirm the hold of a session paid with delivery.
    pub async fn confirm_delivery_hold(
        &self,
        req: &SessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<ConfirmDeliveryHoldResponse>> {
        req.validate()?;
        self.post(ACQUIRING_CONFIRM_DELIVERY_HOLD_PATH, req, opts)
            .await
    }

    /// Fetch the express waybill document.
    ///
    /// The response body is returned as is.
    pub async fn print_express_waybill(
        &self,
        req: &SessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<Bytes>> {
        req.validate()?;
        self.client
            .call_raw(
                Api::Acquiring,
                Method::POST,
                ACQUIRING_PRINT_EXPRESS_WAYBILL_PATH,
                Some(&Json(req)),
                opts,
            )
            .await
    }

    /// Get the status of a session.
    pub async fn get_status(
        &self,
        req: &SessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<GetStatusResponse>> {
        req.validate()?;
        self.post(ACQUIRING_GET_STATUS_PATH, req, opts).await
    }

    /// Get the delivery price for a parcel.
    pub async fn delivery_price(
        &self,
        req: &DeliveryPriceRequest,
        opts: &RunOptions,
    ) -> Result<Option<DeliveryPriceResponse>> {
        req.validate()?;
        self.post(ACQUIRING_DELIVERY_PRICE_PATH, req, opts).await
    }

    /// Call an Acquiring endpoint that has no typed method.
    ///
    /// Wrap structured values in [`Json`]; bytes and strings are sent as
    /// they are and `None` sends no body. No validation runs.
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
            .call_json(Api::Acquiring, method, path, body, opts)
            .await
    }

    async fn post<B, T>(&self, path: &str, body: &B, opts: &RunOptions) -> Result<Option<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.client
            .call_json(Api::Acquiring, Method::POST, path, Some(&Json(body)), opts)
            .await
    }

    async fn post_unit<B>(&self, path: &str, body: &B, opts: &RunOptions) -> Result<()>
    where
        B: Serialize + Sync,
    {
        self.client
            .call_raw(Api::Acquiring, Method::POST, path, Some(&Json(body)), opts)
            .await
            .map(|_| ())
    }
}
