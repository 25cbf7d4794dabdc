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

//! Request validation.

use novapay_core::{Error, ErrorKind, Result};
use std::fmt;

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the field, like `products[0].price`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

/// ValidationError lists every invalid field of a request.
///
/// It reaches callers as the source of a [`ErrorKind::RequestInvalid`] error,
/// use [`ValidationError::from_error`] to get it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Invalid fields in the order they were found.
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Create an empty ValidationError.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invalid field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record `field` as missing when `value` is empty.
    pub(crate) fn require(&mut self, field: impl Into<String>, value: &str) {
        if value.is_empty() {
            self.add(field, "is required");
        }
    }

    /// Record `field` unless `value > 0`.
    ///
    /// NaN is rejected as well.
    pub(crate) fn positive<T: PartialOrd + Default>(&mut self, field: impl Into<String>, value: T) {
        if !(value > T::default()) {
            self.add(field, "must be > 0");
        }
    }

    /// Check if any field was recorded.
    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Turn the collected fields into a result.
    pub fn finish(self) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }
        Err(Error::request_invalid(self.to_string()).with_source(self))
    }

    /// Get the ValidationError carried by `err`, if any.
    pub fn from_error(err: &Error) -> Option<&ValidationError> {
        if err.kind() != ErrorKind::RequestInvalid {
            return None;
        }
        std::error::Error::source(err)?.downcast_ref::<ValidationError>()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.as_slice() {
            [] => write!(f, "validation error"),
            [fe] if fe.field.is_empty() => write!(f, "validation error: {}", fe.message),
            [fe] => write!(f, "validation error: {}: {}", fe.field, fe.message),
            fields => write!(f, "validation error: {} fields", fields.len()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate is implemented by requests that can be checked before sending.
pub trait Validate {
    /// Check the request, listing every invalid field.
    fn validate(&self) -> Result<()>;
}

/// Check whether `err` was produced by request validation.
pub fn is_validation_error(err: &Error) -> bool {
    ValidationError::from_error(err).is_some()
}
