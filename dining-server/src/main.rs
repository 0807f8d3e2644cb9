use dining_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env is optional)
    dotenv::dotenv().ok();

    // 2. Configuration
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    // 3. Logging
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(
        work_dir = %config.work_dir,
        port = config.http_port,
        environment = %config.environment,
        "Dining server starting"
    );

    // 4. Serve until ctrl-c
    Server::new(config).run().await?;

    Ok(())
}
