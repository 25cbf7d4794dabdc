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

//! Canonical request bodies.
//!
//! The `x-sign` header is computed over the exact bytes that go on the wire,
//! so a body is encoded once per attempt and those bytes are both signed and
//! sent. Anything that wants to reformat a body (pretty printing for logs, for
//! example) must work on its own copy.

use crate::{Error, Result};
use bytes::Bytes;
use serde::Serialize;

/// Encode `value` into canonical JSON.
///
/// - no HTML escaping of `<`, `>`, `&` or `'`
/// - no pretty printing
/// - at most one trailing line terminator is stripped
///
/// The returned buffer is freshly allocated and never aliases the caller's data.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    let mut buf = serde_json::to_vec(value)
        .map_err(|e| Error::encode(format!("marshal json body: {e}")).with_source(e))?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Bytes::from(buf))
}

/// RequestBody is anything the transport can turn into a canonical body.
///
/// Structured values go through [`Json`]; byte buffers and strings pass
/// through unchanged. `()` means "no body".
pub trait RequestBody: Send + Sync {
    /// Produce the canonical bytes, or `None` if the request has no body.
    fn canonical_body(&self) -> Result<Option<Bytes>>;
}

/// Json marks a value to be serialized with [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize + Send + Sync> RequestBody for Json<T> {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        encode(&self.0).map(Some)
    }
}

impl RequestBody for () {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        Ok(None)
    }
}

impl RequestBody for [u8] {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        Ok(Some(Bytes::copy_from_slice(self)))
    }
}

impl RequestBody for Vec<u8> {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        self.as_slice().canonical_body()
    }
}

impl RequestBody for Bytes {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        self.as_ref().canonical_body()
    }
}

impl RequestBody for str {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        self.as_bytes().canonical_body()
    }
}

impl RequestBody for String {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        self.as_bytes().canonical_body()
    }
}

impl<T: RequestBody> RequestBody for Option<T> {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        match self {
            Some(v) => v.canonical_body(),
            None => Ok(None),
        }
    }
}

impl<T: RequestBody + ?Sized> RequestBody for &T {
    fn canonical_body(&self) -> Result<Option<Bytes>> {
        (**self).canonical_body()
    }
}
