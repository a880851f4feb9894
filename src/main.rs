use anyhow::{Context, Result};
use filterdeck::{catalog, config::Config, logger::Logger};

fn main() -> Result<()> {
    let config = Config::load()?;
    Logger::from_config(&config.logging)?.install()?;

    let catalog = catalog::global();
    log::info!("Loaded catalog with {} components", catalog.len());

    // Print one descriptor when an id is given, the whole catalog otherwise
    let output = match std::env::args().nth(1) {
        Some(id) => {
            let descriptor = catalog.get(&id)?;
            serde_json::to_string_pretty(descriptor).context("Failed to serialize component descriptor")?
        }
        None => catalog.to_json().context("Failed to serialize catalog")?,
    };

    println!("{}", output);
    Ok(())
}
