use bubbles::Screen;
use bubbles::core::config::{BubblesConfig, load_config, resolve};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "bubbles", about = "Chat-style messaging demo for the terminal")]
struct Args {
    /// Screen to open (overrides the config file)
    #[arg(short, long, value_enum)]
    screen: Option<Screen>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to bubbles.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("bubbles.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        log::warn!("Config load failed: {}", e);
        BubblesConfig::default()
    });
    let resolved = resolve(&config, args.screen);

    log::info!("Bubbles starting up on screen: {:?}", resolved.screen);

    bubbles::tui::run(resolved)
}
