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

/// One payout of `POST /v1/operations/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOperationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Decimal amount as a string, for example `"100.50"`.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_pan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_on_failed_payout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_issued_country: Option<String>,
}

/// Payload of `POST /v1/operations/create`.
///
/// The API wraps the list of payouts in a `RAW_BODY` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOperationsRequest {
    #[serde(rename = "RAW_BODY", default, skip_serializing_if = "Vec::is_empty")]
    pub raw_body: Vec<CreateOperationItem>,
}

impl Validate for CreateOperationsRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        if self.raw_body.is_empty() {
            ve.add("RAW_BODY", "must contain at least one operation");
        }
        for (i, op) in self.raw_body.iter().enumerate() {
            ve.require(format!("RAW_BODY[{i}].amount"), &op.amount);
            if let Some(r) = &op.recipient {
                ve.require(format!("RAW_BODY[{i}].recipient.last_name"), &r.last_name);
                ve.require(format!("RAW_BODY[{i}].recipient.first_name"), &r.first_name);
                ve.require(format!("RAW_BODY[{i}].recipient.patronymic"), &r.patronymic);
                ve.require(format!("RAW_BODY[{i}].recipient.phone"), &r.phone);
            }
        }
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOperationsResponseItem {
    pub guid: String,
    pub public_id: String,
}

/// Payload of `POST /v1/operations/refund`, a list of public operation ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundOperationsRequest {
    #[serde(rename = "RAW_BODY")]
    pub raw_body: Vec<String>,
}

impl Validate for RefundOperationsRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        if self.raw_body.is_empty() {
            ve.add("RAW_BODY", "must contain at least one operation id");
        }
        for (i, id) in self.raw_body.iter().enumerate() {
            ve.require(format!("RAW_BODY[{i}]"), id);
        }
        ve.finish()
    }
}

/// Payload of `POST /v1/operations/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationsStatusRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationsStatusResponse {
    pub status: String,
    pub public_id: String,
}

/// Payload of `POST /v1/operations/change-recipient-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecipientDataRequest {
    pub guid: String,
    pub recipient: ChangeRecipientData,
}

impl Validate for ChangeRecipientDataRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("guid", &self.guid);
        ve.require("recipient.last_name", &self.recipient.last_name);
        ve.require("recipient.first_name", &self.recipient.first_name);
        ve.require("recipient.patronymic", &self.recipient.patronymic);
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecipientData {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_issued_country: Option<String>,
}

/// File format of an operations export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

/// Payload of `POST /v1/export-operations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOperationsRequest {
    pub from_date: String,
    pub to_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    /// Spelled the way the API spells it.
    pub recepient_email: String,
}

impl Validate for ExportOperationsRequest {
    fn validate(&self) -> Result<()> {
        let mut ve = ValidationError::new();
        ve.require("from_date", &self.from_date);
        ve.require("to_date", &self.to_date);
        ve.require("recepient_email", &self.recepient_email);
        ve.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOperationsResponse {
    pub export_id: String,
    pub status: String,
    pub requested_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: String,
}
