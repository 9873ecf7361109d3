//! Publish an article with attachments.
//!
//! ```shell
//! PUSH_API_KEY_ID=... PUSH_API_SECRET=... \
//!     cargo run --example publish -- https://api.example.com/channels/abc/articles cover.jpg
//! ```

use pushsign_core::{Context, OsEnv, Result};
use pushsign_file_read_tokio::TokioFileRead;
use pushsign_http_send_reqwest::ReqwestHttpSend;
use pushsign_push_api::{ApiErrors, Client, Config};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("usage: publish <articles-url> [attachment...]");
        return Ok(());
    };
    let attachments: Vec<String> = args.collect();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_config(ctx, Config::default());

    let article = json!({
        "version": "1.0",
        "identifier": "hello-world",
        "title": "Hello, world",
        "components": [{"role": "body", "text": "Published with pushsign."}],
    });
    let paths: Vec<&str> = attachments.iter().map(String::as_str).collect();

    match client.post(&url, &article, &paths).await {
        Ok(created) => println!("published: {created}"),
        Err(e) => match e.source_as::<ApiErrors>() {
            Some(errors) => {
                for err in &errors.0 {
                    eprintln!("{}: {}", err.code, err.message.as_deref().unwrap_or("-"));
                }
            }
            None => eprintln!("failed to publish: {e}"),
        },
    }

    Ok(())
}
