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

use crate::constants::*;
use novapay_core::key::{parse_rsa_private_key_pem, parse_rsa_public_key_pem};
use novapay_core::utils::Redact;
use novapay_core::{Error, HashAlgorithm, Result, DEFAULT_ATTEMPTS, DEFAULT_WAIT};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::time::Duration;

/// Default HTTP timeout of the client built by `Client::from_config`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Config for a NovaPay client.
///
/// Nothing is checked until the config is handed to `Client::new`, except
/// keys which are parsed as soon as they are set.
#[derive(Clone)]
pub struct Config {
    /// Base url of the Acquiring API.
    pub acquiring_base_url: String,
    /// Base url of the Checkout API.
    pub checkout_base_url: String,
    /// Base url of the Comfort API.
    pub comfort_base_url: String,
    /// Merchant id sent as `x-merchant-id` on every Comfort request.
    pub comfort_merchant_id: Option<String>,
    /// Signature hash of Acquiring and Checkout, SHA-256 by default.
    pub external_hash: HashAlgorithm,
    /// Signature hash of Comfort, SHA-1 by default.
    pub comfort_hash: HashAlgorithm,
    /// Key signing every request.
    pub private_key: Option<RsaPrivateKey>,
    /// Key verifying callbacks.
    pub public_key: Option<RsaPublicKey>,
    /// Attempts per call, at least 1.
    pub retry_attempts: usize,
    /// Wait before the first retry, doubled after every retry.
    pub retry_wait: Duration,
    /// Timeout of the default HTTP client.
    pub timeout: Duration,
    /// Log request and response bodies instead of their sizes.
    pub log_bodies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acquiring_base_url: DEFAULT_ACQUIRING_BASE_URL.to_string(),
            checkout_base_url: DEFAULT_ACQUIRING_BASE_URL.to_string(),
            comfort_base_url: DEFAULT_COMFORT_BASE_URL.to_string(),
            comfort_merchant_id: None,
            external_hash: HashAlgorithm::Sha256,
            comfort_hash: HashAlgorithm::Sha1,
            private_key: None,
            public_key: None,
            retry_attempts: DEFAULT_ATTEMPTS,
            retry_wait: DEFAULT_WAIT,
            timeout: DEFAULT_TIMEOUT,
            log_bodies: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("acquiring_base_url", &self.acquiring_base_url)
            .field("checkout_base_url", &self.checkout_base_url)
            .field("comfort_base_url", &self.comfort_base_url)
            .field("comfort_merchant_id", &Redact::from(&self.comfort_merchant_id))
            .field("external_hash", &self.external_hash)
            .field("comfort_hash", &self.comfort_hash)
            .field("private_key", &self.private_key.as_ref().map(|_| "***"))
            .field("public_key", &self.public_key.as_ref().map(|_| "***"))
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_wait", &self.retry_wait)
            .field("timeout", &self.timeout)
            .field("log_bodies", &self.log_bodies)
            .finish()
    }
}

impl Config {
    /// Create a config with the sandbox defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of `self`.
    ///
    /// Unset variables leave the current value alone. Key paths are read
    /// and parsed right away.
    pub fn from_env(mut self) -> Result<Self> {
        if let Some(v) = env_var(NOVAPAY_ACQUIRING_BASE_URL) {
            self.acquiring_base_url = v;
        }
        if let Some(v) = env_var(NOVAPAY_CHECKOUT_BASE_URL) {
            self.checkout_base_url = v;
        }
        if let Some(v) = env_var(NOVAPAY_COMFORT_BASE_URL) {
            self.comfort_base_url = v;
        }
        if let Some(v) = env_var(NOVAPAY_COMFORT_MERCHANT_ID) {
            self = self.with_comfort_merchant_id(v);
        }
        if let Some(v) = env_var(NOVAPAY_PRIVATE_KEY_PATH) {
            self = self.with_private_key_file(v)?;
        }
        if let Some(v) = env_var(NOVAPAY_PUBLIC_KEY_PATH) {
            self = self.with_public_key_file(v)?;
        }
        Ok(self)
    }

    /// Point Acquiring and Checkout at `url`.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.checkout_base_url = url.clone();
        self.acquiring_base_url = url;
        self
    }

    /// Set the Acquiring base url.
    pub fn with_acquiring_base_url(mut self, url: impl Into<String>) -> Self {
        self.acquiring_base_url = url.into();
        self
    }

    /// Set the Checkout base url.
    pub fn with_checkout_base_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_base_url = url.into();
        self
    }

    /// Set the Comfort base url.
    pub fn with_comfort_base_url(mut self, url: impl Into<String>) -> Self {
        self.comfort_base_url = url.into();
        self
    }

    /// Set the Comfort merchant id. Surrounding whitespace is dropped.
    pub fn with_comfort_merchant_id(mut self, id: impl AsRef<str>) -> Self {
        self.comfort_merchant_id = Some(id.as_ref().trim().to_string());
        self
    }

    /// Use `hash` for every signature.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.external_hash = hash;
        self.comfort_hash = hash;
        self
    }

    /// Use `hash` for Acquiring and Checkout signatures.
    pub fn with_external_hash(mut self, hash: HashAlgorithm) -> Self {
        self.external_hash = hash;
        self
    }

    /// Use `hash` for Comfort signatures.
    pub fn with_comfort_hash(mut self, hash: HashAlgorithm) -> Self {
        self.comfort_hash = hash;
        self
    }

    /// Set the private key.
    pub fn with_private_key(mut self, key: RsaPrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Parse and set a PEM encoded private key.
    pub fn with_private_key_pem(self, pem: impl AsRef<[u8]>) -> Result<Self> {
        Ok(self.with_private_key(parse_rsa_private_key_pem(pem.as_ref())?))
    }

    /// Read, parse and set a PEM encoded private key file.
    pub fn with_private_key_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let pem = read_key_file(path.as_ref())?;
        self.with_private_key_pem(pem)
    }

    /// Set the public key.
    pub fn with_public_key(mut self, key: RsaPublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    /// Parse and set a PEM encoded public key.
    pub fn with_public_key_pem(self, pem: impl AsRef<[u8]>) -> Result<Self> {
        Ok(self.with_public_key(parse_rsa_public_key_pem(pem.as_ref())?))
    }

    /// Read, parse and set a PEM encoded public key file.
    pub fn with_public_key_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let pem = read_key_file(path.as_ref())?;
        self.with_public_key_pem(pem)
    }

    /// Set the retry policy: `attempts` per call, `wait` before the first retry.
    pub fn with_retry(mut self, attempts: usize, wait: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_wait = wait;
        self
    }

    /// Set the timeout of the default HTTP client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Log request and response bodies.
    pub fn with_log_bodies(mut self, log_bodies: bool) -> Self {
        self.log_bodies = log_bodies;
        self
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        Error::config_invalid(format!("read key file {}: {e}", path.display())).with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use novapay_core::ErrorKind;
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::new();
        assert_eq!(cfg.acquiring_base_url, "https://api-qecom.novapay.ua");
        assert_eq!(cfg.checkout_base_url, cfg.acquiring_base_url);
        assert_eq!(cfg.comfort_base_url, "https://contragent-api.novapay.ua");
        assert_eq!(cfg.external_hash, HashAlgorithm::Sha256);
        assert_eq!(cfg.comfort_hash, HashAlgorithm::Sha1);
        assert_eq!(cfg.retry_attempts, 1);
        assert_eq!(cfg.retry_wait, Duration::from_millis(300));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.comfort_merchant_id.is_none());
    }

    #[test]
    fn test_merchant_id_is_trimmed_and_redacted() {
        let cfg = Config::new().with_comfort_merchant_id("  merchant-000123456  ");
        assert_eq!(cfg.comfort_merchant_id.as_deref(), Some("merchant-000123456"));

        let debug = format!("{cfg:?}");
        assert!(!debug.contains("merchant-000123456"));
        assert!(debug.contains("mer***456"));
    }

    #[test]
    fn test_hash_setters() {
        let cfg = Config::new().with_hash(HashAlgorithm::Sha1);
        assert_eq!(cfg.external_hash, HashAlgorithm::Sha1);
        assert_eq!(cfg.comfort_hash, HashAlgorithm::Sha1);

        let cfg = cfg.with_comfort_hash(HashAlgorithm::Sha256);
        assert_eq!(cfg.external_hash, HashAlgorithm::Sha1);
        assert_eq!(cfg.comfort_hash, HashAlgorithm::Sha256);
    }

    #[test]
    fn test_keys_from_files() {
        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let private_pem = key.to_pkcs1_pem(LineEnding::LF).unwrap();
        let public_pem = key.to_public_key().to_pkcs1_pem(LineEnding::LF).unwrap();

        let mut private_file = tempfile::NamedTempFile::new().unwrap();
        private_file.write_all(private_pem.as_bytes()).unwrap();
        let mut public_file = tempfile::NamedTempFile::new().unwrap();
        public_file.write_all(public_pem.as_bytes()).unwrap();

        let cfg = Config::new()
            .with_private_key_file(private_file.path())
            .unwrap()
            .with_public_key_file(public_file.path())
            .unwrap();
        assert_eq!(cfg.private_key.as_ref(), Some(&key));
        assert_eq!(cfg.public_key, Some(key.to_public_key()));
        assert!(format!("{cfg:?}").contains("private_key: Some(\"***\")"));
    }

    #[test]
    fn test_bad_keys() {
        let err = Config::new()
            .with_private_key_file("/definitely/not/here.pem")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Config::new().with_public_key_pem("not a pem").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
