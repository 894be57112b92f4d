use std::path::Path;

use anyhow::Result;

use wheelframe_core::AppConfig;

pub fn run(config: &AppConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            AppConfig::default().save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    if !path.exists() {
        println!("# (file not found, showing defaults)");
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
