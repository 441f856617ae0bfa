use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use common::crypto::SymmetricKey;
use drop_client::transfer::{DirectorySink, HttpTransport, TransferClient, TransferControl};
use drop_client::{ApiClient, ApiError, AppConfig, AppState, StateError};

/// Resolve the remote URL for the API client.
///
/// Priority: explicit `--remote` flag > config file `remote` > hardcoded default.
pub fn resolve_remote(explicit: Option<Url>, config: &AppConfig) -> Url {
    explicit.unwrap_or_else(|| config.remote.clone())
}

/// Resolve the pre-shared key.
///
/// Priority: explicit `--key` / `DROP_KEY` > config file `key_hex` > built-in key.
pub fn resolve_key(explicit: Option<&str>, config: &AppConfig) -> Result<SymmetricKey, StateError> {
    match explicit {
        Some(hex) => Ok(SymmetricKey::from_hex(hex)?),
        None => config.key(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to load config: {0}")]
    State(#[from] StateError),
    #[error("failed to create API client: {0}")]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct OpContext {
    /// API client (always initialized with default or custom URL)
    pub client: ApiClient,
    /// Effective configuration (file values with CLI overrides applied)
    pub config: AppConfig,
    /// Optional custom config path (defaults to ~/.drop)
    pub config_path: Option<PathBuf>,
    /// Pre-shared key, fixed for the life of the process
    pub key: Arc<SymmetricKey>,
}

impl OpContext {
    pub fn new(
        remote: Option<Url>,
        key: Option<&str>,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ContextError> {
        let mut config = AppState::load_or_default(config_path.clone())?;
        config.remote = resolve_remote(remote, &config);
        let key = resolve_key(key, &config)?;

        // transfers carry their own deadline through TransferControl
        Ok(Self {
            client: ApiClient::new(&config.remote, None)?,
            config,
            config_path,
            key: Arc::new(key),
        })
    }

    /// A transfer client saving into `out_dir`, the configured download
    /// directory, or the working directory, in that order
    pub fn transfer_client(&self, out_dir: Option<PathBuf>) -> TransferClient {
        let dir = out_dir
            .or_else(|| self.config.download_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        TransferClient::new(
            Arc::new(HttpTransport::new(self.client.clone())),
            self.key.clone(),
            Arc::new(DirectorySink::new(dir)),
        )
        .with_idle_grace(self.config.idle_grace())
    }

    /// Fresh cancellation/deadline for one transfer
    pub fn control(&self) -> TransferControl {
        TransferControl::new(self.config.timeout())
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
