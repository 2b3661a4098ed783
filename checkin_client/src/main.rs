#[tokio::main]
async fn main() -> std::io::Result<()> {
    checkin_client::run_with_config().await
}
