use std::path::PathBuf;

use clap::Args;

use drop_client::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Directory downloads are saved into (default: working directory)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Per-transfer deadline in seconds, 0 to disable
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // --remote and --key have already been folded into ctx
        let config = AppConfig {
            remote: ctx.client.base_url().clone(),
            key_hex: ctx.key.to_hex(),
            download_dir: self.download_dir.clone(),
            timeout_secs: self.timeout_secs,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let download_dir = match &state.config.download_dir {
            Some(dir) => dir.display().to_string(),
            None => "working directory".to_string(),
        };

        Ok(format!(
            "Initialized drop directory at: {}\n\
             - Config: {}\n\
             - Remote: {}\n\
             - Downloads: {}",
            state.drop_dir.display(),
            state.config_path.display(),
            state.config.remote,
            download_dir
        ))
    }
}
