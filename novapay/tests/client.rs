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

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use log::{Level, LevelFilter};
use novapay::acquiring::{self, CompleteHoldOperation, CompleteHoldRequest, SessionRequest};
use novapay::checkout;
use novapay::comfort::{self, CreateOperationItem, RefundOperationsRequest};
use novapay::{
    Client, Config, Context, Error, ErrorKind, HashAlgorithm, HttpSend, Json, Logger,
    RsaSigner, RunOptions, ValidationError,
};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fmt::Arguments;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;

static KEY: Lazy<RsaPrivateKey> =
    Lazy::new(|| RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("generate rsa key"));

/// Answers from a script and remembers every request.
#[derive(Debug, Clone, Default)]
struct MockHttpSend {
    replies: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    fn new(replies: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, idx: usize) -> http::Request<Bytes> {
        self.requests.lock().unwrap()[idx].clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> novapay::Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        let (code, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, "{}"));
        Ok(http::Response::builder()
            .status(code)
            .body(Bytes::from_static(body.as_bytes()))?)
    }
}

/// Keeps every line it accepts.
#[derive(Debug)]
struct CaptureLogger {
    level: AtomicUsize,
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureLogger {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            level: AtomicUsize::new(LevelFilter::Info as usize),
            lines: Mutex::default(),
        })
    }

    fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for CaptureLogger {
    fn enabled(&self, level: Level) -> bool {
        (level as usize) <= self.level.load(Ordering::Relaxed)
    }

    fn log(&self, level: Level, args: Arguments<'_>) {
        self.lines.lock().unwrap().push((level, args.to_string()));
    }

    fn set_level(&self, level: LevelFilter) {
        self.level.store(level as usize, Ordering::Relaxed);
    }
}

fn config() -> Config {
    Config::new()
        .with_base_url("https://acquiring.example.com/api")
        .with_comfort_base_url("https://comfort.example.com")
        .with_private_key(KEY.clone())
        .with_public_key(KEY.to_public_key())
}

fn client(http: &MockHttpSend, config: Config) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    Client::new(Context::new().with_http_send(http.clone()), config).expect("client must build")
}

fn header(req: &http::Request<Bytes>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
}

fn verifier(hash: HashAlgorithm) -> RsaSigner {
    RsaSigner::new(hash).with_public_key(KEY.to_public_key())
}

#[tokio::test]
async fn test_acquiring_request_is_signed_with_sha256() {
    let http = MockHttpSend::new([(200, r#"{"id":"s-1","status":"paid","paytype":"card"}"#)]);
    let client = client(&http, config());

    let resp = client
        .acquiring()
        .get_status(&SessionRequest::new("m-1", "s-1"), &RunOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resp.id, "s-1");
    assert_eq!(resp.session_status(), Some(novapay::constants::SessionStatus::Paid));

    let req = http.request(0);
    assert_eq!(req.method(), Method::POST);
    assert_eq!(
        req.uri().to_string(),
        "https://acquiring.example.com/api/v1/get-status"
    );
    assert_eq!(
        &req.body()[..],
        br#"{"merchant_id":"m-1","session_id":"s-1"}"#
    );
    assert_eq!(header(&req, "x-merchant-id"), None);

    let sig = header(&req, "x-sign").unwrap();
    verifier(HashAlgorithm::Sha256).verify(req.body(), &sig).unwrap();
    let err = verifier(HashAlgorithm::Sha1)
        .verify(req.body(), &sig)
        .unwrap_err();
    assert!(err.is_verify_error());
}

#[tokio::test]
async fn test_comfort_request_is_signed_with_sha1_and_merchant_id() {
    let http = MockHttpSend::new([(200, r#"[{"guid":"g-1","public_id":"p-1"}]"#)]);
    let client = client(&http, config().with_comfort_merchant_id(" merchant-42 "));

    let req = comfort::CreateOperationsRequest {
        raw_body: vec![CreateOperationItem {
            guid: Some("g-1".to_string()),
            amount: "100.50".to_string(),
            ..Default::default()
        }],
    };
    let items = client
        .comfort()
        .create_operations(&req, &RunOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].public_id, "p-1");

    let sent = http.request(0);
    assert_eq!(
        sent.uri().to_string(),
        "https://comfort.example.com/v1/operations/create"
    );
    assert_eq!(
        &sent.body()[..],
        br#"{"RAW_BODY":[{"guid":"g-1","amount":"100.50"}]}"#
    );
    assert_eq!(header(&sent, "x-merchant-id").as_deref(), Some("merchant-42"));

    let sig = header(&sent, "x-sign").unwrap();
    verifier(HashAlgorithm::Sha1).verify(sent.body(), &sig).unwrap();
    client.verify_comfort(sent.body(), &sig).unwrap();
}

#[tokio::test]
async fn test_comfort_without_merchant_id_is_never_sent() {
    let http = MockHttpSend::default();
    let client = client(&http, config());

    let err = client
        .comfort()
        .balance(&RunOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("comfort merchant id is not configured"));

    let err = client
        .comfort()
        .refund_operations(&RefundOperationsRequest::default(), &RunOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(http.count(), 0);
}

#[tokio::test]
async fn test_balance_is_get_without_body() {
    let http = MockHttpSend::new([(200, r#"{"balance":"1500.00"}"#)]);
    let client = client(&http, config().with_comfort_merchant_id("m-1"));

    let balance = client
        .comfort()
        .balance(&RunOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, "1500.00");

    let req = http.request(0);
    assert_eq!(req.method(), Method::GET);
    assert_eq!(req.uri().to_string(), "https://comfort.example.com/v1/balance");
    assert!(req.body().is_empty());
    assert_eq!(header(&req, "content-type"), None);

    // An empty body is signed as zero bytes.
    let sig = header(&req, "x-sign").unwrap();
    verifier(HashAlgorithm::Sha1).verify(b"", &sig).unwrap();
}

#[tokio::test]
async fn test_operations_status_sends_empty_object_by_default() {
    let http = MockHttpSend::new([(200, r#"{"status":"done","public_id":"p-1"}"#)]);
    let client = client(&http, config().with_comfort_merchant_id("m-1"));

    let status = client
        .comfort()
        .operations_status(None, &RunOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.status, "done");
    assert_eq!(&http.request(0).body()[..], b"{}");
}

#[tokio::test]
async fn test_validation_stops_the_call() {
    let http = MockHttpSend::default();
    let client = client(&http, config());

    let req = CompleteHoldRequest {
        merchant_id: "m-1".to_string(),
        session_id: String::new(),
        amount: Some(0.0),
        operations: vec![CompleteHoldOperation {
            id: "op-1".to_string(),
            amount: 10.0,
            recipient_identifier: String::new(),
        }],
    };
    let err = client
        .acquiring()
        .complete_hold(&req, &RunOptions::new().dry_run())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);

    let fields: Vec<_> = ValidationError::from_error(&err)
        .unwrap()
        .fields
        .iter()
        .map(|f| f.field.clone())
        .collect();
    assert_eq!(
        fields,
        vec!["session_id", "amount", "operations[0].recipient_identifier"]
    );
    assert_eq!(http.count(), 0);
}

#[tokio::test]
async fn test_dry_run_hands_canonical_body_to_handler() {
    let http = MockHttpSend::default();
    let client = client(&http, config());
    let seen: Arc<Mutex<Vec<(Method, String, Option<Vec<u8>>)>>> = Arc::default();

    let captured = seen.clone();
    let opts = RunOptions::new().dry_run_with(move |method, url, body| {
        captured
            .lock()
            .unwrap()
            .push((method.clone(), url.to_string(), body.map(|b| b.to_vec())));
    });

    let req = checkout::CreateSessionRequest {
        merchant_id: "m-1".to_string(),
        callback_url: "https://shop.example.com/cb?a=1&b=<2>".to_string(),
        ..Default::default()
    };
    let resp = client.checkout().create_session(&req, &opts).await.unwrap();
    assert_eq!(resp, None);

    client
        .checkout()
        .void_session(&checkout::SessionRequest::new("m-1", "s-1"), &opts)
        .await
        .unwrap();

    assert_eq!(http.count(), 0);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, Method::POST);
    assert_eq!(
        seen[0].1,
        "https://acquiring.example.com/api/v1/checkout/session"
    );
    assert_eq!(
        seen[0].2.as_deref(),
        Some(&br#"{"merchant_id":"m-1","callback_url":"https://shop.example.com/cb?a=1&b=<2>"}"#[..])
    );
    assert_eq!(seen[1].1, "https://acquiring.example.com/api/v1/void");
}

#[tokio::test]
async fn test_default_dry_run_logs_through_client_logger() {
    let http = MockHttpSend::default();
    let logger = CaptureLogger::new();
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_shared_logger(logger.clone());
    let client = Client::new(ctx, config()).unwrap();

    client
        .acquiring()
        .expire_session(&SessionRequest::new("m-1", "s-1"), &RunOptions::new().dry_run())
        .await
        .unwrap();

    assert_eq!(http.count(), 0);
    let lines = logger.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        (
            Level::Info,
            "Dry run: skipping request POST https://acquiring.example.com/api/v1/expire".to_string()
        )
    );
    assert!(lines[1].1.starts_with("Dry run payload:\n{"));
    assert!(lines[1].1.contains("\"session_id\": \"s-1\""));

    client.set_log_level(LevelFilter::Warn);
    client
        .acquiring()
        .expire_session(&SessionRequest::new("m-1", "s-1"), &RunOptions::new().dry_run())
        .await
        .unwrap();
    assert_eq!(logger.lines().len(), 2);
}

#[tokio::test]
async fn test_print_express_waybill_returns_raw_body() {
    let http = MockHttpSend::new([(200, "%PDF-1.4 waybill")]);
    let client = client(&http, config());

    let raw = client
        .acquiring()
        .print_express_waybill(&SessionRequest::new("m-1", "s-1"), &RunOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&raw[..], b"%PDF-1.4 waybill");
}

#[tokio::test]
async fn test_unit_endpoints_ignore_response_body() {
    let http = MockHttpSend::new([(200, "not json at all"), (200, "")]);
    let client = client(&http, config());

    client
        .acquiring()
        .void_session(&SessionRequest::new("m-1", "s-1"), &RunOptions::new())
        .await
        .unwrap();
    client
        .checkout()
        .expire_session(&checkout::SessionRequest::new("m-1", "s-1"), &RunOptions::new())
        .await
        .unwrap();
    assert_eq!(http.count(), 2);
}

#[test_case(400; "bad request")]
#[test_case(404; "not found")]
#[test_case(501; "not implemented")]
#[tokio::test]
async fn test_status_error_keeps_response(code: u16) {
    let http = MockHttpSend::new([(code, r#"{"error":"nope"}"#)]);
    let client = client(
        &http,
        config().with_retry(3, Duration::from_millis(1)),
    );

    let err = client
        .acquiring()
        .add_payment(
            &acquiring::AddPaymentRequest {
                merchant_id: "m-1".to_string(),
                session_id: "s-1".to_string(),
                amount: 10.5,
                ..Default::default()
            },
            &RunOptions::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(
        err.to_string(),
        format!(r#"unexpected status: {code}: {{"error":"nope"}}"#)
    );
    assert_eq!(err.status(), Some(StatusCode::from_u16(code).unwrap()));
    assert_eq!(err.body().map(|b| &b[..]), Some(&br#"{"error":"nope"}"#[..]));
    assert_eq!(http.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_policy_from_config() {
    let http = MockHttpSend::new([(503, ""), (429, ""), (200, r#"{"id":"s-9"}"#)]);
    let client = client(&http, config().with_retry(3, Duration::from_millis(100)));

    let resp = client
        .acquiring()
        .create_session(
            &acquiring::CreateSessionRequest {
                merchant_id: "m-1".to_string(),
                client_phone: "+380000000000".to_string(),
                ..Default::default()
            },
            &RunOptions::new(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resp.id, "s-9");
    assert_eq!(http.count(), 3);

    // Each attempt carries a signature over its own body.
    for idx in 0..3 {
        let req = http.request(idx);
        let sig = header(&req, "x-sign").unwrap();
        client.verify(req.body(), &sig).unwrap();
    }
}

#[tokio::test]
async fn test_generic_call() -> anyhow::Result<()> {
    let http = MockHttpSend::new([(200, r#"{"ok":true}"#)]);
    let client = client(&http, config().with_comfort_merchant_id("m-1"));

    let out: Option<Value> = client
        .comfort()
        .call(
            Method::POST,
            "/v2/custom",
            Some(&Json(json!({"b": 1, "a": [1, 2]}))),
            &RunOptions::new(),
        )
        .await?;
    assert_eq!(out, Some(json!({"ok": true})));

    let req = http.request(0);
    assert_eq!(req.uri().to_string(), "https://comfort.example.com/v2/custom");
    assert_eq!(&req.body()[..], br#"{"a":[1,2],"b":1}"#);
    Ok(())
}

#[tokio::test]
async fn test_generic_call_sends_bytes_and_strings_unchanged() -> anyhow::Result<()> {
    let http = MockHttpSend::new([(200, "{}"), (200, "{}")]);
    let client = client(&http, config());

    let raw = br#"{"z":1, "a":2}"#.to_vec();
    let _: Option<Value> = client
        .acquiring()
        .call(Method::POST, "/v1/x", Some(&raw), &RunOptions::new())
        .await?;
    let text = r#"{"b":2}"#.to_string();
    let _: Option<Value> = client
        .checkout()
        .call(Method::POST, "/v1/y", Some(&text), &RunOptions::new())
        .await?;

    let first = http.request(0);
    assert_eq!(&first.body()[..], &raw[..]);
    client.verify(first.body(), &header(&first, "x-sign").unwrap())?;

    let second = http.request(1);
    assert_eq!(&second.body()[..], text.as_bytes());
    client.verify(second.body(), &header(&second, "x-sign").unwrap())?;
    Ok(())
}

#[tokio::test]
async fn test_dry_run_sees_raw_body_unchanged() -> anyhow::Result<()> {
    let http = MockHttpSend::default();
    let client = client(&http, config());
    let seen: Arc<Mutex<Option<Vec<u8>>>> = Arc::default();

    let captured = seen.clone();
    let opts = RunOptions::new().dry_run_with(move |_, _, body| {
        *captured.lock().unwrap() = body.map(|b| b.to_vec());
    });
    let out: Option<Value> = client
        .acquiring()
        .call(Method::POST, "/v1/x", Some("not json"), &opts)
        .await?;

    assert_eq!(out, None);
    assert_eq!(seen.lock().unwrap().as_deref(), Some(&b"not json"[..]));
    assert_eq!(http.count(), 0);
    Ok(())
}

#[test]
fn test_verify_postback() {
    let client = client(&MockHttpSend::default(), config());

    let body = json!({
        "id": "s-1",
        "status": "paid",
        "RRN": "123456789012",
        "APPROVAL": 77,
        "payments": [{"amount": 10.5}, {"amount": 4.5}]
    })
    .to_string();
    let sig = client.sign(body.as_bytes()).unwrap();

    let postback = client.verify_postback(body.as_bytes(), &sig).unwrap();
    assert_eq!(postback.id, "s-1");
    assert_eq!(postback.rrn, "123456789012");
    assert_eq!(postback.approval, 77);
    assert_eq!(postback.total_amount(), 15.0);

    let tampered = body.replace("paid", "voided");
    let err = client
        .verify_postback(tampered.as_bytes(), &sig)
        .unwrap_err();
    assert!(err.is_verify_error());

    let err: Error = client.verify_postback(body.as_bytes(), "").unwrap_err();
    assert!(err.is_verify_error());
}
