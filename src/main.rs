use redlotus::configuration::get_configuration;
use redlotus::outbound::telemetry::init_logger;
use redlotus::startup;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let configuration = get_configuration()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    init_logger("redlotus", &configuration.log_level(), std::io::stdout);

    let application = startup::build(configuration).await?;
    tracing::info!(port = application.port(), "Listening");

    application.run_until_stopped().await?;
    Ok(())
}
