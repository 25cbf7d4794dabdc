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

use serde::{Deserialize, Serialize};
use std::fmt;

// Headers used by NovaPay.
pub const X_SIGN: &str = "x-sign";
pub const X_MERCHANT_ID: &str = "x-merchant-id";

// Base urls.
/// Acquiring and Checkout sandbox.
pub const DEFAULT_ACQUIRING_BASE_URL: &str = "https://api-qecom.novapay.ua";
/// Acquiring and Checkout production.
pub const PRODUCTION_ACQUIRING_BASE_URL: &str = "https://api-ecom.novapay.ua";
pub const DEFAULT_COMFORT_BASE_URL: &str = "https://contragent-api.novapay.ua";

// Env values used by `Config::from_env`.
pub const NOVAPAY_ACQUIRING_BASE_URL: &str = "NOVAPAY_ACQUIRING_BASE_URL";
pub const NOVAPAY_CHECKOUT_BASE_URL: &str = "NOVAPAY_CHECKOUT_BASE_URL";
pub const NOVAPAY_COMFORT_BASE_URL: &str = "NOVAPAY_COMFORT_BASE_URL";
pub const NOVAPAY_COMFORT_MERCHANT_ID: &str = "NOVAPAY_COMFORT_MERCHANT_ID";
pub const NOVAPAY_PRIVATE_KEY_PATH: &str = "NOVAPAY_PRIVATE_KEY_PATH";
pub const NOVAPAY_PUBLIC_KEY_PATH: &str = "NOVAPAY_PUBLIC_KEY_PATH";

// Acquiring endpoints.
pub const ACQUIRING_CREATE_SESSION_PATH: &str = "/v1/session";
pub const ACQUIRING_ADD_PAYMENT_PATH: &str = "/v1/payment";
pub const ACQUIRING_VOID_SESSION_PATH: &str = "/v1/void";
pub const ACQUIRING_COMPLETE_HOLD_PATH: &str = "/v1/complete-hold";
pub const ACQUIRING_EXPIRE_SESSION_PATH: &str = "/v1/expire";
pub const ACQUIRING_CONFIRM_DELIVERY_HOLD_PATH: &str = "/v1/confirm-delivery-hold";
pub const ACQUIRING_PRINT_EXPRESS_WAYBILL_PATH: &str = "/v1/print-express-waybill";
pub const ACQUIRING_GET_STATUS_PATH: &str = "/v1/get-status";
pub const ACQUIRING_DELIVERY_PRICE_PATH: &str = "/v1/delivery-price";

// Checkout endpoints.
pub const CHECKOUT_CREATE_SESSION_PATH: &str = "/v1/checkout/session";
pub const CHECKOUT_ADD_PAYMENT_PATH: &str = "/v1/checkout/payment";
pub const CHECKOUT_VOID_SESSION_PATH: &str = "/v1/void";
pub const CHECKOUT_GET_STATUS_PATH: &str = "/v1/get-status";
pub const CHECKOUT_EXPIRE_SESSION_PATH: &str = "/v1/expire";

// Comfort endpoints.
pub const COMFORT_CREATE_OPERATIONS_PATH: &str = "/v1/operations/create";
pub const COMFORT_REFUND_OPERATIONS_PATH: &str = "/v1/operations/refund";
pub const COMFORT_OPERATIONS_STATUS_PATH: &str = "/v1/operations/status";
pub const COMFORT_CHANGE_RECIPIENT_DATA_PATH: &str = "/v1/operations/change-recipient-data";
pub const COMFORT_BALANCE_PATH: &str = "/v1/balance";
pub const COMFORT_EXPORT_OPERATIONS_PATH: &str = "/v1/export-operations";

/// Status of an acquiring payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Expired,
    Processing,
    Holded,
    HoldConfirmed,
    ProcessingHoldCompletion,
    Paid,
    Failed,
    ProcessingVoid,
    Voided,
}

impl SessionStatus {
    /// Wire value of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::Expired => "expired",
            SessionStatus::Processing => "processing",
            SessionStatus::Holded => "holded",
            SessionStatus::HoldConfirmed => "hold_confirmed",
            SessionStatus::ProcessingHoldCompletion => "processing_hold_completion",
            SessionStatus::Paid => "paid",
            SessionStatus::Failed => "failed",
            SessionStatus::ProcessingVoid => "processing_void",
            SessionStatus::Voided => "voided",
        }
    }

    /// Parse a wire value, `None` for statuses this crate does not know.
    pub fn parse(s: &str) -> Option<Self> {
        let v = match s {
            "created" => SessionStatus::Created,
            "expired" => SessionStatus::Expired,
            "processing" => SessionStatus::Processing,
            "holded" => SessionStatus::Holded,
            "hold_confirmed" => SessionStatus::HoldConfirmed,
            "processing_hold_completion" => SessionStatus::ProcessingHoldCompletion,
            "paid" => SessionStatus::Paid,
            "failed" => SessionStatus::Failed,
            "processing_void" => SessionStatus::ProcessingVoid,
            "voided" => SessionStatus::Voided,
            _ => return None,
        };
        Some(v)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_wire_values() {
        for status in [
            SessionStatus::Created,
            SessionStatus::HoldConfirmed,
            SessionStatus::ProcessingHoldCompletion,
            SessionStatus::Voided,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("refunded"), None);
    }
}
