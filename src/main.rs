use std::env;
use std::error::Error;
use std::process;

use clap::Parser;

use xone_poll::cli::Args;
use xone_poll::drivers::xbox_one::driver::Driver;
use xone_poll::input::sink::LogSink;
use xone_poll::input::source::{xbox_one::XboxOne, SourceDriver, SourceDriverOptions};
use xone_poll::usb::device::UsbTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    let config = args.load_config()?;
    log::debug!("Using config: {config:?}");

    // Select and prepare the controller
    let mut transport = UsbTransport::new(config.debug, config.read_timeout())?;
    let mut driver = match Driver::open(&mut transport) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Failed to initialize controller: {e}");
            return Err(e.into());
        }
    };
    if config.readonly {
        log::info!("Read-only mode, skipping initialization");
    } else if let Err(e) = driver.initialize() {
        log::error!("Failed to initialize: {e}");
        return Err(e.into());
    }

    log::info!("Polling frequency set to {} Hz", config.poll_frequency);
    log::info!("Xbox One controller connected and initialized");

    let options = SourceDriverOptions {
        poll_rate: config.poll_interval(),
        ..Default::default()
    };
    let mut source = SourceDriver::new_with_options(XboxOne::new(driver), LogSink, options);
    let client = source.client();

    // Setup CTRL+C handler. A second CTRL+C exits even if a read is stuck.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        log::info!("Shutting down");
        if let Err(e) = client.stop().await {
            log::error!("Unable to stop polling: {e}");
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            process::exit(1);
        }
    });

    // Reads block, so poll from a blocking task
    let task = tokio::task::spawn_blocking(move || source.run());
    task.await?;

    log::info!("Controller disconnected");

    Ok(())
}
