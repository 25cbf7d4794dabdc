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

use crate::acquiring::{Acquiring, Postback};
use crate::checkout::Checkout;
use crate::comfort::Comfort;
use crate::constants::X_MERCHANT_ID;
use crate::run::RunOptions;
use crate::Config;
use bytes::Bytes;
use http::Method;
use log::LevelFilter;
use novapay_core::utils::Redact;
use novapay_core::{
    Context, Error, RequestBody, Result, RetryPolicy, RsaSigner, Sign, Transport,
    TransportResponse,
};
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use url::Url;

/// Which NovaPay API a call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Api {
    Acquiring,
    Checkout,
    Comfort,
}

/// Client talks to the NovaPay Acquiring, Checkout and Comfort APIs.
///
/// Acquiring and Checkout share one transport signing with the external
/// hash. Comfort has its own transport signing with the comfort hash and
/// sending `x-merchant-id`. Both use the same key pair.
///
/// Client is cheap to clone.
#[derive(Clone)]
pub struct Client {
    ctx: Context,
    external: Transport,
    comfort: Transport,
    external_signer: Arc<RsaSigner>,
    comfort_signer: Arc<RsaSigner>,
    acquiring_base_url: Url,
    checkout_base_url: Url,
    comfort_base_url: Url,
    comfort_merchant_id: Option<String>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("ctx", &self.ctx)
            .field("external_signer", &self.external_signer)
            .field("comfort_signer", &self.comfort_signer)
            .field("acquiring_base_url", &self.acquiring_base_url.as_str())
            .field("checkout_base_url", &self.checkout_base_url.as_str())
            .field("comfort_base_url", &self.comfort_base_url.as_str())
            .field("comfort_merchant_id", &Redact::from(&self.comfort_merchant_id))
            .finish()
    }
}

impl Client {
    /// Create a client sending through `ctx`.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let acquiring_base_url = parse_base_url("acquiring", &config.acquiring_base_url)?;
        let checkout_base_url = parse_base_url("checkout", &config.checkout_base_url)?;
        let comfort_base_url = parse_base_url("comfort", &config.comfort_base_url)?;
        let retry = RetryPolicy::new(config.retry_attempts, config.retry_wait)?;

        let comfort_merchant_id = match config.comfort_merchant_id.as_deref().map(str::trim) {
            Some("") => {
                return Err(Error::config_invalid("comfort merchant id is empty"));
            }
            Some(id) => Some(id.to_string()),
            None => None,
        };

        let external_signer = Arc::new(keyed_signer(
            RsaSigner::new(config.external_hash),
            &config,
        ));
        let comfort_signer = Arc::new(keyed_signer(RsaSigner::new(config.comfort_hash), &config));

        let external = Transport::new(ctx.clone())
            .with_shared_signer(external_signer.clone())
            .with_retry(retry)
            .with_log_bodies(config.log_bodies);
        let mut comfort = Transport::new(ctx.clone())
            .with_shared_signer(comfort_signer.clone())
            .with_retry(retry)
            .with_log_bodies(config.log_bodies);
        if let Some(id) = &comfort_merchant_id {
            comfort = comfort.with_default_headers([(X_MERCHANT_ID, id.as_str())]);
        }

        Ok(Self {
            ctx,
            external,
            comfort,
            external_signer,
            comfort_signer,
            acquiring_base_url,
            checkout_base_url,
            comfort_base_url,
            comfort_merchant_id,
        })
    }

    /// Create a client with the reqwest sender and [`novapay_core::StdLogger`].
    ///
    /// The HTTP client uses `config.timeout`.
    #[cfg(feature = "default-context")]
    pub fn from_config(config: Config) -> Result<Self> {
        let ctx = Context::new()
            .with_http_send(novapay_http_send_reqwest::ReqwestHttpSend::with_timeout(
                config.timeout,
            ))
            .with_logger(novapay_core::StdLogger::default());
        Self::new(ctx, config)
    }

    /// Acquiring API.
    pub fn acquiring(&self) -> Acquiring<'_> {
        Acquiring::new(self)
    }

    /// Checkout API.
    pub fn checkout(&self) -> Checkout<'_> {
        Checkout::new(self)
    }

    /// Comfort API.
    pub fn comfort(&self) -> Comfort<'_> {
        Comfort::new(self)
    }

    /// Context this client sends through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Change the log level of the client's logger, if it supports it.
    pub fn set_log_level(&self, level: LevelFilter) {
        self.ctx.set_log_level(level);
    }

    /// Sign `body` the way Acquiring and Checkout requests are signed.
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        self.external_signer.sign(body)
    }

    /// Sign `body` the way Comfort requests are signed.
    pub fn sign_comfort(&self, body: &[u8]) -> Result<String> {
        self.comfort_signer.sign(body)
    }

    /// Verify an Acquiring or Checkout `x-sign` over the exact `body` bytes.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<()> {
        self.external_signer.verify(body, signature)
    }

    /// Verify a Comfort `x-sign` over the exact `body` bytes.
    pub fn verify_comfort(&self, body: &[u8], signature: &str) -> Result<()> {
        self.comfort_signer.verify(body, signature)
    }

    /// Verify an Acquiring postback and decode it.
    ///
    /// The body is only decoded once its signature checks out.
    pub fn verify_postback(&self, body: &[u8], signature: &str) -> Result<Postback> {
        self.verify(body, signature)?;
        serde_json::from_slice(body)
            .map_err(|e| Error::decode(format!("decode postback: {e}")).with_source(e))
    }

    /// Send a request and decode the JSON response.
    ///
    /// `body` goes through [`RequestBody`], so bytes and strings are sent
    /// as they are. Returns `None` for a dry run.
    pub(crate) async fn call_json<B, T>(
        &self,
        api: Api,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: &RunOptions,
    ) -> Result<Option<T>>
    where
        B: RequestBody + ?Sized,
        T: DeserializeOwned,
    {
        let (transport, url) = self.prepare(api, path)?;
        if self.dry_run(&method, &url, body, opts)? {
            return Ok(None);
        }

        let resp: TransportResponse<T> = match body {
            Some(body) => {
                transport
                    .do_json(method, url.as_str(), body, opts.call_options())
                    .await?
            }
            None => {
                transport
                    .do_json(method, url.as_str(), &(), opts.call_options())
                    .await?
            }
        };
        Ok(Some(resp.data))
    }

    /// Send a request and return the raw response body.
    ///
    /// Returns `None` for a dry run.
    pub(crate) async fn call_raw<B>(
        &self,
        api: Api,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: &RunOptions,
    ) -> Result<Option<Bytes>>
    where
        B: RequestBody + ?Sized,
    {
        let (transport, url) = self.prepare(api, path)?;
        if self.dry_run(&method, &url, body, opts)? {
            return Ok(None);
        }

        let resp = match body {
            Some(body) => {
                transport
                    .send(method, url.as_str(), body, opts.call_options())
                    .await?
            }
            None => {
                transport
                    .send(method, url.as_str(), &(), opts.call_options())
                    .await?
            }
        };
        Ok(Some(resp.body))
    }

    fn prepare(&self, api: Api, path: &str) -> Result<(&Transport, Url)> {
        match api {
            Api::Acquiring => Ok((&self.external, join_url(&self.acquiring_base_url, path))),
            Api::Checkout => Ok((&self.external, join_url(&self.checkout_base_url, path))),
            Api::Comfort => {
                self.ensure_comfort_ready()?;
                Ok((&self.comfort, join_url(&self.comfort_base_url, path)))
            }
        }
    }

    pub(crate) fn ensure_comfort_ready(&self) -> Result<()> {
        if self.comfort_merchant_id.is_none() {
            return Err(Error::config_invalid(
                "comfort merchant id is not configured; use Config::with_comfort_merchant_id",
            ));
        }
        Ok(())
    }

    fn dry_run<B>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        opts: &RunOptions,
    ) -> Result<bool>
    where
        B: RequestBody + ?Sized,
    {
        if !opts.is_dry_run() {
            return Ok(false);
        }
        let body = match body {
            Some(body) => body.canonical_body()?,
            None => None,
        };
        Ok(opts.handle_dry_run(&self.ctx, method, url.as_str(), body.as_deref()))
    }
}

fn keyed_signer(mut signer: RsaSigner, config: &Config) -> RsaSigner {
    if let Some(key) = &config.private_key {
        signer = signer.with_private_key(key.clone());
    }
    if let Some(key) = &config.public_key {
        signer = signer.with_public_key(key.clone());
    }
    signer
}

fn parse_base_url(name: &str, value: &str) -> Result<Url> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::config_invalid(format!("{name} base url is empty")));
    }
    let url = Url::parse(value).map_err(|e| {
        Error::config_invalid(format!("invalid {name} base url {value:?}: {e}")).with_source(e)
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::config_invalid(format!(
            "invalid {name} base url {value:?}: http or https url required"
        )));
    }
    Ok(url)
}

/// Append `path` to the path of `base` with exactly one `/` between them.
fn join_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}
