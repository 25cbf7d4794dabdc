use novapay::acquiring::{AddPaymentRequest, Delivery, Product};
use novapay::{Client, Config, Result, RunOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init();

    // No key is needed: a dry run stops before signing.
    let client = Client::from_config(Config::new())?;

    let req = AddPaymentRequest {
        merchant_id: "1".to_string(),
        session_id: "a1b2c3".to_string(),
        amount: 250.0,
        use_hold: Some(true),
        delivery: Some(Delivery {
            volume_weight: 0.5,
            weight: 1.2,
            recipient_city: "db5c88d0-391c-11dd-90d9-001a92567626".to_string(),
            recipient_warehouse: "1ec09d88-e1c2-11e3-8c4a-0050568002cf".to_string(),
        }),
        products: vec![Product {
            description: "Notebook".to_string(),
            count: 2,
            price: 125.0,
        }],
        ..Default::default()
    };

    // Logged through the client's logger.
    client
        .acquiring()
        .add_payment(&req, &RunOptions::new().dry_run())
        .await?;

    // Handed to a closure instead.
    client
        .acquiring()
        .add_payment(
            &req,
            &RunOptions::new().dry_run_with(|method, url, body| {
                let size = body.map(|b| b.len()).unwrap_or_default();
                println!("would send {method} {url} with {size} bytes");
            }),
        )
        .await?;

    Ok(())
}
