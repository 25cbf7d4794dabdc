use novapay::{Client, Config, Result};
use std::env;

// Usage: verify_postback <public-key.pem> <body.json> <x-sign>
fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: {} <public-key.pem> <body.json> <x-sign>", args[0]);
        std::process::exit(2);
    }

    let config = Config::new().with_public_key_file(&args[1])?;
    let client = Client::from_config(config)?;

    let body = std::fs::read(&args[2])?;
    match client.verify_postback(&body, &args[3]) {
        Ok(postback) => {
            println!("session:  {}", postback.id);
            println!("status:   {:?}", postback.session_status());
            println!("amount:   {}", postback.total_amount());
        }
        Err(err) if err.is_verify_error() => {
            println!("signature rejected: {err}");
            std::process::exit(1);
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
