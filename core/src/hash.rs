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

//! Hash related utils.

use crate::{Error, VerifyFailure};
use base64::prelude::{BASE64_STANDARD, BASE64_STANDARD_NO_PAD};
use base64::Engine;
use rsa::Pkcs1v15Sign;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

/// Hash algorithm used under the RSA PKCS#1 v1.5 signature.
///
/// Acquiring and Checkout use SHA-256, Comfort uses SHA-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// SHA-1.
    Sha1,
}

impl HashAlgorithm {
    /// Canonical name of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha1 => "SHA-1",
        }
    }

    /// Compute the digest of `content`.
    pub fn digest(&self, content: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(content).to_vec(),
            HashAlgorithm::Sha1 => Sha1::digest(content).to_vec(),
        }
    }

    /// PKCS#1 v1.5 signature scheme carrying this digest's OID.
    pub(crate) fn pkcs1v15(&self) -> Pkcs1v15Sign {
        match self {
            HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHA-256" | "" | "sha256" | "SHA256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "SHA-1" | "sha1" | "SHA1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            v => Err(Error::config_invalid(format!(
                "unsupported signature hash algorithm: {v:?}"
            ))),
        }
    }
}

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode a signature.
///
/// Surrounding whitespace is trimmed. Padded standard base64 is tried first, then
/// the unpadded form since some relays strip trailing `=`.
pub fn base64_decode_signature(content: &str) -> crate::Result<Vec<u8>> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::verify(
            VerifyFailure::EmptySignature,
            "signature: empty signature",
        ));
    }

    let std_err = match BASE64_STANDARD.decode(content) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    match BASE64_STANDARD_NO_PAD.decode(content) {
        Ok(v) => Ok(v),
        Err(raw_err) => Err(Error::verify(
            VerifyFailure::MalformedSignature,
            format!("signature: invalid base64 signature: std={std_err}; raw={raw_err}"),
        )
        .with_source(raw_err)),
    }
}
