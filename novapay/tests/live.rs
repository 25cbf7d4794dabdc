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

//! Smoke tests against the NovaPay sandbox.
//!
//! Set `NOVAPAY_TEST=on` plus the `NOVAPAY_*` variables read by
//! `Config::from_env` and `NOVAPAY_MERCHANT_ID`, in the environment or in `.env`.

use log::{debug, warn};
use novapay::acquiring::{CreateSessionRequest, SessionRequest};
use novapay::{Client, Config, Result, RunOptions};
use std::env;
use std::time::Duration;

fn init_client() -> Option<(Client, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("NOVAPAY_TEST").is_err() || env::var("NOVAPAY_TEST").unwrap() != "on" {
        return None;
    }

    let merchant_id = env::var("NOVAPAY_MERCHANT_ID").expect("env NOVAPAY_MERCHANT_ID must set");
    let config = Config::new()
        .with_retry(3, Duration::from_millis(500))
        .from_env()
        .expect("config from env must load");
    let client = Client::from_config(config).expect("client must build");
    Some((client, merchant_id))
}

#[tokio::test]
async fn test_create_session_and_get_status() -> Result<()> {
    let Some((client, merchant_id)) = init_client() else {
        warn!("NOVAPAY_TEST is not set, skipped");
        return Ok(());
    };

    let session = client
        .acquiring()
        .create_session(
            &CreateSessionRequest {
                merchant_id: merchant_id.clone(),
                client_phone: "+380982850620".to_string(),
                ..Default::default()
            },
            &RunOptions::new().with_timeout(Duration::from_secs(30)),
        )
        .await?
        .expect("session must be returned");
    debug!("created session: {session:?}");
    assert!(!session.id.is_empty());

    let status = client
        .acquiring()
        .get_status(
            &SessionRequest::new(&merchant_id, &session.id),
            &RunOptions::new(),
        )
        .await?
        .expect("status must be returned");
    assert_eq!(status.id, session.id);
    assert_eq!(status.status, "created");
    Ok(())
}

#[tokio::test]
async fn test_expire_session() -> Result<()> {
    let Some((client, merchant_id)) = init_client() else {
        warn!("NOVAPAY_TEST is not set, skipped");
        return Ok(());
    };

    let session = client
        .acquiring()
        .create_session(
            &CreateSessionRequest {
                merchant_id: merchant_id.clone(),
                client_phone: "+380982850620".to_string(),
                ..Default::default()
            },
            &RunOptions::new(),
        )
        .await?
        .expect("session must be returned");

    client
        .acquiring()
        .expire_session(
            &SessionRequest::new(&merchant_id, &session.id),
            &RunOptions::new(),
        )
        .await?;
    Ok(())
}
