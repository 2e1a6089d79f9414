use crate::error::ErrorClearPolicy;
use crate::utils::{self, DEFAULT_CHUNK_SIZE};

pub const ENV_TRACE: &str = "VPI_TRACE";
pub const ENV_ERROR_CLEAR_ON_QUERY: &str = "VPI_ERROR_CLEAR_ON_QUERY";
pub const ENV_STRING_CHUNK_SIZE: &str = "VPI_STRING_CHUNK_SIZE";

/// Runtime switches. `Default` is the no-environment configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VpiConfig {
    /// Trace destination: `-` for stdout, otherwise a file path.
    pub trace: Option<String>,
    pub error_policy: ErrorClearPolicy,
    pub string_chunk_size: usize,
}

impl Default for VpiConfig {
    fn default() -> Self {
        Self {
            trace: None,
            error_policy: ErrorClearPolicy::Sticky,
            string_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl VpiConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.trace = std::env::var(ENV_TRACE).ok().filter(|v| !v.is_empty());

        if utils::env_flag(ENV_ERROR_CLEAR_ON_QUERY).unwrap_or(false) {
            config.error_policy = ErrorClearPolicy::ClearOnQuery;
        }

        if let Ok(v) = std::env::var(ENV_STRING_CHUNK_SIZE) {
            match v.parse::<usize>() {
                Ok(size) if size > 0 => config.string_chunk_size = size,
                _ => log::warn!(
                    "[config] ignoring {ENV_STRING_CHUNK_SIZE}={v:?}, using {DEFAULT_CHUNK_SIZE}"
                ),
            }
        }

        log::debug!("[config] {:?}", config);
        config
    }

    pub fn with_trace(mut self, dest: impl Into<String>) -> Self {
        self.trace = Some(dest.into());
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorClearPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}
