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

use crate::validate::{Validate, ValidationError};
use novapay_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of `POST /v1/checkout/session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub merchant_id: String,
    pub callback_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_express_waybill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<SessionDelivery>,
}

impl Validate for CreateSessionRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("callback_url", &self.callback_url);

        let create_waybill = self.create_express_waybill == Some(true);
        match &self.delivery {
            None if create_waybill => {
                ve.add("delivery", "is required when create_express_waybill is true")
            }
            None => {}
            Some(d) => {
                if !create_waybill {
                    ve.add(
                        "create_express_waybill",
                        "must be true when delivery is provided",
                    );
                }
                ve.positive("delivery.volume_weight", d.volume_weight);
                ve.positive("delivery.weight", d.weight);
            }
        }
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDelivery {
    pub volume_weight: f64,
    pub weight: f64,
}

/// Payload of `POST /v1/checkout/payment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddPaymentRequest {
    pub merchant_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_hold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl Validate for AddPaymentRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("session_id", &self.session_id);
        ve.positive("amount", self.amount);
        for (i, p) in self.products.iter().enumerate() {
            ve.positive(format!("products[{i}].count"), p.count);
            ve.positive(format!("products[{i}].price"), p.price);
        }
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub count: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Payload of the checkout endpoints that only need `merchant_id` and `session_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub merchant_id: String,
    pub session_id: String,
}

impl SessionRequest {
    /// Create a new SessionRequest.
    pub fn new(merchant_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            session_id: session_id.into(),
        }
    }
}

impl Validate for SessionRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("session_id", &self.session_id);
        ve.finish()
    }
}

/// Checkout responses are not fully documented, so they are kept as JSON objects.
pub type GenericResponse = Map<String, Value>;
