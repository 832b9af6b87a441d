use rps::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rps::init_tracing();

    let config = ServerConfig::from_env()?;
    let server = RpsServer::builder().config(config).build().await?;
    tracing::info!(addr = %server.local_addr()?, "starting rps server");

    server.run().await?;
    Ok(())
}
