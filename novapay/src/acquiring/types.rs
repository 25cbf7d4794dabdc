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

use crate::constants::SessionStatus;
use crate::validate::{Validate, ValidationError};
use novapay_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of `POST /v1/session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub merchant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_patronymic: Option<String>,
    pub client_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_redirect_timeout: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Validate for CreateSessionRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("client_phone", &self.client_phone);
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Payload of `POST /v1/payment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddPaymentRequest {
    pub merchant_id: String,
    pub session_id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_hold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Delivery>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl Validate for AddPaymentRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("session_id", &self.session_id);
        ve.positive("amount", self.amount);

        if let Some(d) = &self.delivery {
            if self.use_hold != Some(true) {
                ve.add("use_hold", "must be true when delivery is provided");
            }
            ve.positive("delivery.volume_weight", d.volume_weight);
            ve.positive("delivery.weight", d.weight);
            ve.require("delivery.recipient_city", &d.recipient_city);
            ve.require("delivery.recipient_warehouse", &d.recipient_warehouse);
        }

        for (i, p) in self.products.iter().enumerate() {
            ve.require(format!("products[{i}].description"), &p.description);
            ve.positive(format!("products[{i}].count"), p.count);
            ve.positive(format!("products[{i}].price"), p.price);
        }
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub volume_weight: f64,
    pub weight: f64,
    pub recipient_city: String,
    pub recipient_warehouse: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub description: String,
    pub count: i32,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddPaymentResponse {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_price: Option<f64>,
}

/// Payload of the endpoints that only need `merchant_id` and `session_id`.
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

/// Payload of `POST /v1/complete-hold`.
///
/// Without `amount` the whole hold is charged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteHoldRequest {
    pub merchant_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<CompleteHoldOperation>,
}

impl Validate for CompleteHoldRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("session_id", &self.session_id);
        if let Some(amount) = self.amount {
            ve.positive("amount", amount);
        }
        for (i, op) in self.operations.iter().enumerate() {
            ve.require(format!("operations[{i}].id"), &op.id);
            ve.positive(format!("operations[{i}].amount"), op.amount);
            ve.require(
                format!("operations[{i}].recipient_identifier"),
                &op.recipient_identifier,
            );
        }
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteHoldOperation {
    pub id: String,
    pub amount: f64,
    pub recipient_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmDeliveryHoldResponse {
    pub id: String,
    pub express_waybill: String,
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Payload of `POST /v1/delivery-price`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPriceRequest {
    pub merchant_id: String,
    pub recipient_city: String,
    pub recipient_warehouse: String,
    pub volume_weight: f64,
    pub weight: f64,
    pub amount: f64,
}

impl Validate for DeliveryPriceRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("merchant_id", &self.merchant_id);
        ve.require("recipient_city", &self.recipient_city);
        ve.require("recipient_warehouse", &self.recipient_warehouse);
        ve.positive("volume_weight", self.volume_weight);
        ve.positive("weight", self.weight);
        ve.positive("amount", self.amount);
        ve.finish()
    }
}

/// The delivery price schema is not published, so it is kept as a JSON object.
pub type DeliveryPriceResponse = Map<String, Value>;

/// Response of `POST /v1/get-status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetStatusResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub paytype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_patronymic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationInfo>,
}

impl GetStatusResponse {
    /// Parsed session status, `None` if the status is not a known one.
    pub fn session_status(&self) -> Option<SessionStatus> {
        SessionStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub amount: f64,
}

/// Callback payload NovaPay posts to `callback_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Postback {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub paytype: String,
    #[serde(default)]
    pub terminal_name: String,
    #[serde(default, rename = "RRN")]
    pub rrn: String,
    #[serde(default, rename = "APPROVAL")]
    pub approval: i64,

    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub client_first_name: String,
    #[serde(default)]
    pub client_last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_patronymic: Option<String>,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    #[serde(default)]
    pub processing_result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_details: Option<PostbackCard>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<PostbackPayment>,
}

impl Postback {
    /// Parsed session status, `None` if the status is not a known one.
    pub fn session_status(&self) -> Option<SessionStatus> {
        SessionStatus::parse(&self.status)
    }

    /// Sum of all payment amounts.
    pub fn total_amount(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostbackCard {
    pub pan: String,
    pub card_bank: String,
    pub card_country: String,
    pub card_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostbackPayment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;
    use novapay_core::encode;
    use pretty_assertions::assert_eq;

    fn fields(err: &novapay_core::Error) -> Vec<String> {
        ValidationError::from_error(err)
            .expect("validation error")
            .fields
            .iter()
            .map(|f| f.field.clone())
            .collect()
    }

    #[test]
    fn test_create_session_does_not_require_callback_url() {
        let req = CreateSessionRequest {
            merchant_id: "1".to_string(),
            client_phone: "+380980000000".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let err = CreateSessionRequest::default().validate().unwrap_err();
        assert_eq!(fields(&err), vec!["merchant_id", "client_phone"]);
    }

    #[test]
    fn test_add_payment_delivery_requires_hold() {
        let req = AddPaymentRequest {
            merchant_id: "1".to_string(),
            session_id: "s".to_string(),
            amount: 100.0,
            delivery: Some(Delivery {
                volume_weight: 0.1,
                weight: 0.0,
                recipient_city: "Kyiv".to_string(),
                recipient_warehouse: String::new(),
            }),
            products: vec![Product {
                description: "Book".to_string(),
                count: 0,
                price: 10.0,
            }],
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                "use_hold",
                "delivery.weight",
                "delivery.recipient_warehouse",
                "products[0].count"
            ]
        );
    }

    #[test]
    fn test_complete_hold() {
        let mut req = CompleteHoldRequest {
            merchant_id: "1".to_string(),
            session_id: "s".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        req.amount = Some(0.0);
        req.operations.push(CompleteHoldOperation {
            id: String::new(),
            amount: 5.0,
            recipient_identifier: String::new(),
        });
        let err = req.validate().unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                "amount",
                "operations[0].id",
                "operations[0].recipient_identifier"
            ]
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let req = AddPaymentRequest {
            merchant_id: "1".to_string(),
            session_id: "s".to_string(),
            amount: 12.5,
            ..Default::default()
        };
        assert_eq!(
            &encode(&req).unwrap()[..],
            br#"{"merchant_id":"1","session_id":"s","amount":12.5}"#
        );
    }

    #[test]
    fn test_postback_decode() {
        let body = br#"{"id":"p-1","status":"paid","paytype":"card","RRN":"123","APPROVAL":42,
            "payments":[{"amount":10.5},{"amount":4.5,"external_id":"e"}]}"#;
        let pb: Postback = serde_json::from_slice(body).unwrap();
        assert_eq!(pb.rrn, "123");
        assert_eq!(pb.approval, 42);
        assert_eq!(pb.session_status(), Some(SessionStatus::Paid));
        assert_eq!(pb.total_amount(), 15.0);
    }
}
