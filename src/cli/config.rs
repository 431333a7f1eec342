use repo_sync::config::Config;
use repo_sync::core::path::config_file;
use repo_sync::core::SyncResult;

/// Print the effective configuration (file plus environment overrides)
pub fn show() -> SyncResult<()> {
    let config = Config::load()?;
    println!("# {}", config_file()?.display());
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

pub fn path() -> SyncResult<()> {
    println!("{}", config_file()?.display());
    Ok(())
}
