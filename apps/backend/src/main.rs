#[tokio::main]
async fn main() -> anyhow::Result<()> {
    projectflow_backend::run().await
}
