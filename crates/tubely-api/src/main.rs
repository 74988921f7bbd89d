use tubely_api::setup;
use tubely_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;
    tubely_api::init_tracing(&config.log_format)?;

    let router = setup::initialize_app(&config).await?;
    setup::server::start_server(&config, router).await?;

    Ok(())
}
