#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stylebot_lib::run().await
}
