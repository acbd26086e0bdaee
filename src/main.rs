use signup_relay::{config::AppConfig, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        signup_relay::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        signup_relay::init_dbg_tracing();
    }

    let config = AppConfig::load()?;
    let app = App::build_from_config(config).await?;

    signup_relay::serve(app).await?;

    Ok(())
}
