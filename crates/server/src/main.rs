#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ragsite_server::start().await
}
