//! The single-slot error register and the crate's error enums.

use std::fmt;

use crate::vpi_user::{ErrorLevel, ErrorPhase};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to open trace file `{path}`: {source}")]
    TraceOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a query does to the slot it reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorClearPolicy {
    /// A recorded error stays until the next report or an explicit clear.
    #[default]
    Sticky,
    /// Reading the error empties the slot.
    ClearOnQuery,
}

/// One recorded error, as handed back by `chk_error`.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorInfo {
    pub level: ErrorLevel,
    pub phase: ErrorPhase,
    pub code: String,
    pub message: String,
    pub product: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} [{}] {}", self.product, self.level, self.code, self.message)?;
        if let Some(file) = &self.file {
            write!(f, " ({}:{})", file, self.line.unwrap_or(0))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ErrorRecord {
    level: ErrorLevel,
    phase: ErrorPhase,
    code: String,
    message: String,
    file: Option<String>,
    line: Option<u32>,
}

#[derive(Debug, Default)]
pub struct ErrorState {
    slot: Option<ErrorRecord>,
    policy: ErrorClearPolicy,
}

impl ErrorState {
    pub fn new(policy: ErrorClearPolicy) -> Self {
        Self { slot: None, policy }
    }

    /// Overwrites whatever the slot held.
    pub fn report(
        &mut self,
        level: ErrorLevel,
        phase: ErrorPhase,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.slot = Some(ErrorRecord {
            level,
            phase,
            code: code.into(),
            message: message.into(),
            file: None,
            line: None,
        });
    }

    pub fn report_at(
        &mut self,
        level: ErrorLevel,
        phase: ErrorPhase,
        code: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) {
        self.report(level, phase, code, message);
        if let Some(rec) = self.slot.as_mut() {
            rec.file = Some(file.into());
            rec.line = Some(line);
        }
    }

    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    /// Reads the slot, stamping the record with `product`.
    pub fn query(&mut self, product: &str) -> Option<ErrorInfo> {
        let rec = match self.policy {
            ErrorClearPolicy::Sticky => self.slot.clone()?,
            ErrorClearPolicy::ClearOnQuery => self.slot.take()?,
        };

        Some(ErrorInfo {
            level: rec.level,
            phase: rec.phase,
            code: rec.code,
            message: rec.message,
            product: product.to_string(),
            file: rec.file,
            line: rec.line,
        })
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
