#![windows_subsystem = "windows"]

use anyhow::Result;
use holdsend::{config::Config, gui};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    gui::launch(config)?;

    Ok(())
}
