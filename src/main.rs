use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    productbot::run().await
}
