use http::Method;
use novapay_core::{CallOptions, Context, Json, RetryPolicy, StdLogger, Transport};
use novapay_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().try_init();

    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .user_agent("novapay-example/1.0")
        .build()?;

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::new(client))
        .with_logger(StdLogger::new(log::LevelFilter::Debug));

    // No signer: the sandbox will reject the call, which shows the error path.
    let transport = Transport::new(ctx)
        .with_retry(RetryPolicy::new(2, Duration::from_millis(300))?)
        .with_log_bodies(true);

    let res = transport
        .do_json::<_, serde_json::Value>(
            Method::POST,
            "https://api-qecom.novapay.ua/v1/get-status",
            &Json(serde_json::json!({"merchant_id": "1", "session_id": "unknown"})),
            &CallOptions::default(),
        )
        .await;

    match res {
        Ok(resp) => println!("status: {}, data: {}", resp.status, resp.data),
        Err(err) => eprintln!("request failed ({}): {err}", err.kind()),
    }
    Ok(())
}
