use std::io::Write;

use pushy::config::Config;
use pushy::error::PushyError;
use pushy::pushbullet::PushbulletClient;
use pushy::{dispatch, log, plog};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    log::init();

    let config = Config::resolve().unwrap_or_else(|e| {
        plog!("config load failed: {e}");
        println!("{}", PushyError::from(e));
        std::process::exit(1);
    });

    let client = PushbulletClient::new(&config.api_url);
    let mut stdin = tokio::io::stdin();
    let mut stdout = std::io::stdout();

    let code = dispatch::run(
        std::env::args_os(),
        &config,
        &mut stdin,
        &client,
        &mut stdout,
    )
    .await;

    let _ = stdout.flush();
    std::process::exit(code);
}
