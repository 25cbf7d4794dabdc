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

//! Checkout API: hosted checkout sessions.
//!
//! Responses are not typed, every endpoint returns the decoded JSON object.

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

/// Checkout endpoints of a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Checkout<'a> {
    client: &'a Client,
}

impl<'a> Checkout<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a checkout session.
    pub async fn create_session(
        &self,
        req: &CreateSessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<GenericResponse>> {
        req.validate()?;
        self.post(CHECKOUT_CREATE_SESSION_PATH, req, opts).await
    }

    /// Attach an order to a checkout session.
    pub async fn add_payment(
        &self,
        req: &AddPaymentRequest,
        opts: &RunOptions,
    ) -> Result<Option<GenericResponse>> {
        req.validate()?;
        self.post(CHECKOUT_ADD_PAYMENT_PATH, req, opts).await
    }

    /// Void a checkout session.
    pub async fn void_session(&self, req: &SessionRequest, opts: &RunOptions) -> Result<()> {
        req.validate()?;
        self.client
            .call_raw(
                Api::Checkout,
                Method::POST,
                CHECKOUT_VOID_SESSION_PATH,
                Some(&Json(req)),
                opts,
            )
            .await
            .map(|_| ())
    }

    /// Get the status of a checkout session.
    pub async fn get_status(
        &self,
        req: &SessionRequest,
        opts: &RunOptions,
    ) -> Result<Option<GenericResponse>> {
        req.validate()?;
        self.post(CHECKOUT_GET_STATUS_PATH, req, opts).await
    }

    /// Expire a checkout session.
    pub async fn expire_session(&self, req: &SessionRequest, opts: &RunOptions) -> Result<()> {
        req.validate()?;
        self.client
            .call_raw(
                Api::Checkout,
                Method::POST,
                CHECKOUT_EXPIRE_SESSION_PATH,
                Some(&Json(req)),
                opts,
            )
            .await
            .map(|_| ())
    }

    /// Call a Checkout endpoint that has no typed method.
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
            .call_json(Api::Checkout, method, path, body, opts)
            .await
    }

    async fn post<B>(&self, path: &str, body: &B, opts: &RunOptions) -> Result<Option<GenericResponse>>
    where
        B: Serialize + Sync,
    {
        self.client
            .call_json(Api::Checkout, Method::POST, path, Some(&Json(body)), opts)
            .await
    }
}
