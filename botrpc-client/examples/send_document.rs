//! Upload a file and print the resulting message.
//!
//! Usage:
//!   BOT_TOKEN=123456:ABC-DEF CHAT_ID=42 \
//!     cargo run -p botrpc-client --example send-document --features tracing -- ./report.pdf
//!
//!   # Point at a local bot API server instead of the public one:
//!   BOT_API_ENDPOINT=http://localhost:8081/bot{token}/{method} ...
//!
//! Set `RUST_LOG=botrpc_client=debug` to see retries.

use std::env;
use std::time::Duration;

use botrpc_client::{BotClient, DEFAULT_ENDPOINT, open_file, params};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let token = env::var("BOT_TOKEN")?;
    let chat_id: i64 = env::var("CHAT_ID")?.parse()?;
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: send-document <path>"))?;
    let endpoint = env::var("BOT_API_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

    let client = BotClient::builder(token)
        .endpoint(endpoint)
        .timeout(Duration::from_secs(60))
        .on_error(|err| eprintln!("[{}] {err}", err.kind().as_str()))
        .build()?;

    let me = client.get_me().await?;
    println!("Bot: @{}", me["username"].as_str().unwrap_or("?"));

    let message = client
        .send_document(params! {
            "chat_id" => chat_id,
            "document" => open_file(&path).await?,
            "caption" => format!("Uploaded from {path}"),
        })
        .await?;

    println!("Sent message {}", message["message_id"]);
    Ok(())
}
