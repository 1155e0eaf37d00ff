use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cfg = server::config::load()?;
    server::start_server(cfg).await
}
