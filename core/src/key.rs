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

//! PEM parsing for RSA keys.

use crate::{Error, Result};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";
const PEM_DASHES: &str = "-----";

/// Locate the first PEM block, returning its label and the block text.
///
/// Anything before the first `BEGIN` line or after its matching `END`
/// line is ignored.
fn first_pem_block(pem: &str) -> Result<(&str, &str)> {
    let invalid = || Error::config_invalid("signature: invalid PEM (no block)");

    let start = pem.find(PEM_BEGIN).ok_or_else(invalid)?;
    let after_begin = &pem[start + PEM_BEGIN.len()..];
    let label_len = after_begin.find(PEM_DASHES).ok_or_else(invalid)?;
    let label = &after_begin[..label_len];

    let end_marker = format!("{PEM_END}{label}{PEM_DASHES}");
    let end = pem[start..].find(&end_marker).ok_or_else(invalid)?;
    let block = &pem[start..start + end + end_marker.len()];

    Ok((label, block))
}

fn pem_str(pem: &[u8]) -> Result<&str> {
    std::str::from_utf8(pem)
        .map_err(|e| Error::config_invalid("signature: invalid PEM (not utf-8)").with_source(e))
}

/// Parse a PEM encoded RSA private key.
///
/// Both PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) blocks are accepted.
/// A PKCS#8 key for any algorithm other than RSA is rejected.
pub fn parse_rsa_private_key_pem(pem: &[u8]) -> Result<RsaPrivateKey> {
    let (label, block) = first_pem_block(pem_str(pem)?)?;
    match label {
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_pem(block).map_err(|e| {
            Error::config_invalid(format!("signature: parse PKCS#1 private key: {e}"))
        }),
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_pem(block).map_err(|e| {
            Error::config_invalid(format!(
                "signature: parse PKCS#8 private key (RSA required): {e}"
            ))
        }),
        v => Err(Error::config_invalid(format!(
            "signature: unsupported private key type: {v:?}"
        ))),
    }
}

/// Parse a PEM encoded RSA public key.
///
/// Both PKIX (`PUBLIC KEY`) and PKCS#1 (`RSA PUBLIC KEY`) blocks are accepted.
pub fn parse_rsa_public_key_pem(pem: &[u8]) -> Result<RsaPublicKey> {
    let (label, block) = first_pem_block(pem_str(pem)?)?;
    match label {
        "PUBLIC KEY" => RsaPublicKey::from_public_key_pem(block).map_err(|e| {
            Error::config_invalid(format!(
                "signature: parse PKIX public key (RSA required): {e}"
            ))
        }),
        "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_pem(block).map_err(|e| {
            Error::config_invalid(format!("signature: parse PKCS#1 public key: {e}"))
        }),
        v => Err(Error::config_invalid(format!(
            "signature: unsupported public key type: {v:?}"
        ))),
    }
}
