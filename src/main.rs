use dotenvy::dotenv;
use order_api::{build_server, build_state, create_pool, run_migrations, AppConfig, StartupError};

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let pool = create_pool(
        &config.database.connection_string(),
        config.database.pool_max_size,
    )?;
    run_migrations(&pool)?;

    log::info!(
        "Connected to {}:{}/{}; starting server at http://{}:{}",
        config.database.host,
        config.database.port,
        config.database.name,
        config.host,
        config.port
    );

    let state = build_state(pool, &config);
    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
