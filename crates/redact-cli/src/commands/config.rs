use anyhow::Result;
use redact_config::Config;
use std::path::Path;

pub fn handle(config: &Config, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
