use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    eatme_feeds_lib::run().await
}
