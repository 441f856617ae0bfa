pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "drop")]
#[command(about = "Upload to, list and download from an encrypted file-drop server")]
#[command(version)]
pub struct Args {
    /// Server base URL (defaults to the config file, then http://localhost:5000)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the drop config directory (defaults to ~/.drop)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Pre-shared key as 64 hex digits (defaults to the config file)
    #[arg(long, global = true, env = "DROP_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_validated() {
        let args = Args::try_parse_from(["drop", "--log-level", "debug", "version"]).unwrap();
        assert_eq!(args.log_level, tracing::Level::DEBUG);

        let args = Args::try_parse_from(["drop", "version"]).unwrap();
        assert_eq!(args.log_level, tracing::Level::WARN);

        assert!(Args::try_parse_from(["drop", "--log-level", "loud", "version"]).is_err());
    }
}
