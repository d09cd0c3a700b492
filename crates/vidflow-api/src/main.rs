use anyhow::Context;
use vidflow_api::setup;
use vidflow_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under large upload bodies,
// especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env().context("Invalid configuration")?;

    let app = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, app.router).await?;

    for task in app.background {
        task.abort();
    }

    Ok(())
}
