use prolink_artwork::cli::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    run().await
}
