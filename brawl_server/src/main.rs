#[tokio::main]
async fn main() -> std::io::Result<()> {
    brawl_server::run_with_config().await
}
