#[tokio::main]
async fn main() -> anyhow::Result<()> {
    time2learn_lib::run().await
}
