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

use crate::hash::{base64_decode_signature, base64_encode, HashAlgorithm};
use crate::utils::Redact;
use crate::{Error, Result, VerifyFailure};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt::{Debug, Formatter};

/// Sign produces the `x-sign` header value for an exact request body.
///
/// The transport calls it once per attempt with the bytes it is about to send.
pub trait Sign: Debug + Send + Sync + 'static {
    /// Sign `body` and return the base64 encoded signature.
    fn sign(&self, body: &[u8]) -> Result<String>;
}

/// RsaSigner signs and verifies `x-sign` signatures using RSA PKCS#1 v1.5.
///
/// Either key may be absent. The absence only surfaces when the matching
/// operation is called.
#[derive(Clone, Default)]
pub struct RsaSigner {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
    hash: HashAlgorithm,
}

impl Debug for RsaSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let modulus = self
            .public_key
            .as_ref()
            .map(|k| k.n().to_str_radix(16))
            .unwrap_or_default();
        f.debug_struct("RsaSigner")
            .field("private_key", &self.private_key.as_ref().map(|_| "***"))
            .field("public_key", &Redact::from(&modulus))
            .field("hash", &self.hash)
            .finish()
    }
}

impl RsaSigner {
    /// Create a signer without keys using the given hash algorithm.
    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            private_key: None,
            public_key: None,
            hash,
        }
    }

    /// Set the private key used by [`Sign::sign`].
    pub fn with_private_key(mut self, key: RsaPrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Set the public key used by [`RsaSigner::verify`].
    pub fn with_public_key(mut self, key: RsaPublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    /// Replace the hash algorithm.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Hash algorithm in use.
    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    /// Check whether a private key is configured.
    pub fn can_sign(&self) -> bool {
        self.private_key.is_some()
    }

    /// Check whether a public key is configured.
    pub fn can_verify(&self) -> bool {
        self.public_key.is_some()
    }

    /// Verify a base64 signature over the exact `body` bytes.
    ///
    /// The signature may carry surrounding whitespace and may have its `=`
    /// padding stripped.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<()> {
        let Some(key) = &self.public_key else {
            return Err(Error::config_invalid(
                "signature: public key is not configured",
            ));
        };

        let sig = base64_decode_signature(signature)?;
        let digest = self.hash.digest(body);
        key.verify(self.hash.pkcs1v15(), &digest, &sig)
            .map_err(|e| {
                Error::verify(
                    VerifyFailure::Mismatch,
                    format!("signature: verify failed: {e}"),
                )
                .with_source(anyhow::anyhow!("{e}"))
            })
    }
}

impl Sign for RsaSigner {
    fn sign(&self, body: &[u8]) -> Result<String> {
        let Some(key) = &self.private_key else {
            return Err(Error::config_invalid(
                "signature: private key is not configured",
            ));
        };

        let digest = self.hash.digest(body);
        let sig = key
            .sign(self.hash.pkcs1v15(), &digest)
            .map_err(|e| Error::sign(format!("signature: rsa sign: {e}")))?;
        Ok(base64_encode(&sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::encode;
    use crate::key::tests::TEST_KEY;
    use crate::ErrorKind;
    use serde_json::json;

    fn signer(hash: HashAlgorithm) -> RsaSigner {
        RsaSigner::new(hash)
            .with_private_key(TEST_KEY.clone())
            .with_public_key(TEST_KEY.to_public_key())
    }

    #[test]
    fn test_sign_and_verify_encoded_body() -> anyhow::Result<()> {
        let signer = signer(HashAlgorithm::Sha256);
        let body = encode(&json!({"id": "123", "status": "ok"}))?;

        let sig = signer.sign(&body)?;
        signer.verify(&body, &sig)?;

        // Verifying with the other hash must fail even though the key matches.
        let sha1 = signer.clone().with_hash(HashAlgorithm::Sha1);
        let err = sha1.verify(&body, &sig).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Verify(VerifyFailure::Mismatch));
        Ok(())
    }

    #[test]
    fn test_single_byte_mutation_fails() -> anyhow::Result<()> {
        let signer = signer(HashAlgorithm::Sha256);
        let body = encode(&json!({"amount": 100.5, "note": "<b>&</b>"}))?;
        let sig = signer.sign(&body)?;

        for idx in [0, body.len() / 2, body.len() - 1] {
            let mut mutated = body.to_vec();
            mutated[idx] ^= 0x01;
            let err = signer.verify(&mutated, &sig).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Verify(VerifyFailure::Mismatch));
        }
        Ok(())
    }

    #[test]
    fn test_sign_is_deterministic_for_both_hashes() -> anyhow::Result<()> {
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha1] {
            let signer = signer(hash);
            assert_eq!(signer.sign(b"payload")?, signer.sign(b"payload")?);
            signer.verify(b"payload", &signer.sign(b"payload")?)?;
        }
        Ok(())
    }

    #[test]
    fn test_sign_empty_body() -> anyhow::Result<()> {
        let signer = signer(HashAlgorithm::Sha1);
        let sig = signer.sign(&[])?;
        assert!(!sig.is_empty());
        signer.verify(&[], &sig)?;
        Ok(())
    }

    #[test]
    fn test_verify_tolerates_whitespace_and_stripped_padding() -> anyhow::Result<()> {
        let signer = signer(HashAlgorithm::Sha256);
        let sig = signer.sign(b"{}")?;

        signer.verify(b"{}", &format!("  {sig}\r\n"))?;
        signer.verify(b"{}", sig.trim_end_matches('='))?;
        signer.verify(b"{}", &format!("\t{}\n", sig.trim_end_matches('=')))?;
        Ok(())
    }

    #[test]
    fn test_verify_failure_reasons() {
        let signer = signer(HashAlgorithm::Sha256);

        let err = signer.verify(b"{}", " \n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Verify(VerifyFailure::EmptySignature));

        let err = signer.verify(b"{}", "%%%not-base64%%%").unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::Verify(VerifyFailure::MalformedSignature)
        );

        let err = signer.verify(b"{}", &base64_encode(b"garbage")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Verify(VerifyFailure::Mismatch));
    }

    #[test]
    fn test_missing_keys() {
        let signer = RsaSigner::new(HashAlgorithm::Sha256);
        assert!(!signer.can_sign());
        assert!(!signer.can_verify());

        let err = signer.sign(b"{}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(!err.is_retryable());

        let err = signer.verify(b"{}", "aGk=").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let out = format!("{:?}", signer(HashAlgorithm::Sha1));
        assert!(out.contains("private_key: Some(\"***\")"));
        assert!(out.contains("Sha1"));
    }
}
