use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use novapay_core::{
    CallOptions, Context, Error, HttpSend, Json, Result, Sign, StdLogger, Transport,
};
use serde_json::json;

// A signer backed by something other than an in-process RSA key,
// for example a hardware module reached over a socket.
#[derive(Debug)]
struct RemoteSigner {
    key_id: String,
}

impl Sign for RemoteSigner {
    fn sign(&self, body: &[u8]) -> Result<String> {
        if self.key_id.is_empty() {
            return Err(Error::config_invalid("remote signer: key id is empty"));
        }
        // In a real implementation, the body would be sent to the signing service here
        Ok(format!("{}:{}", self.key_id, body.len()))
    }
}

// An HTTP sender that answers every request locally.
#[derive(Debug)]
struct EchoHttpSend;

#[async_trait]
impl HttpSend for EchoHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        println!("{} {}", req.method(), req.uri());
        for (name, value) in req.headers() {
            println!("  {name}: {value:?}");
        }
        let resp = http::Response::builder()
            .status(200)
            .body(Bytes::from_static(b"{\"status\":\"ok\"}"))?;
        Ok(resp)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new()
        .with_http_send(EchoHttpSend)
        .with_logger(StdLogger::new(log::LevelFilter::Debug));

    let transport = Transport::new(ctx)
        .with_signer(RemoteSigner {
            key_id: "demo-key".to_string(),
        })
        .with_log_bodies(true);

    let resp = transport
        .do_json::<_, serde_json::Value>(
            Method::POST,
            "https://api.example.com/v1/get-status",
            &Json(json!({"merchant_id": "m-1", "session_id": "s-1"})),
            &CallOptions::default(),
        )
        .await?;

    println!("status: {}, data: {}", resp.status, resp.data);
    Ok(())
}
