use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use self::errors::WorklogError;
use self::store::Store;

pub mod errors;
mod query;
mod session;
mod store;
mod task;

const WORKLOG_FILE: &str = "worklog.csv";
const CONFIG_FILE: &str = "worklog.toml";

#[derive(Debug, Deserialize)]
pub struct WorklogConfig {
    #[serde(default = "default_store")]
    pub store: PathBuf,
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

impl Default for WorklogConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            confirm_delete: default_confirm_delete(),
        }
    }
}

fn default_store() -> PathBuf {
    PathBuf::from(WORKLOG_FILE)
}

fn default_confirm_delete() -> bool {
    true
}

fn parse_config() -> Result<WorklogConfig, WorklogError> {
    let cur_dir = std::env::current_dir()?;
    let config_path = cur_dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(WorklogConfig::default());
    }

    let config = std::fs::read_to_string(config_path)?;
    Ok(toml::from_str(&config)?)
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the loaded store before the session starts
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), WorklogError> {
    let args = Args::parse();
    let config = parse_config()?;
    let store = Store::new(&config.store);

    if args.debug {
        println!(
            "=== Entries in {} ===\n{:?}\n=====================",
            store.path().display(),
            store.load_all()?
        );
    }

    println!("\n*** Welcome to Work Log ***");
    session::run(&store, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply_to_missing_keys() {
        let config: WorklogConfig = toml::from_str("").unwrap();
        assert_eq!(config.store, PathBuf::from(WORKLOG_FILE));
        assert!(config.confirm_delete);
    }

    #[test]
    fn config_accepts_store_and_confirm_delete() {
        let text = "store = \"logs/tasks.csv\"\nconfirm_delete = false\n";
        let config: WorklogConfig = toml::from_str(text).unwrap();
        assert_eq!(config.store, PathBuf::from("logs/tasks.csv"));
        assert!(!config.confirm_delete);
    }
}
