//! Line-oriented trace of every boundary call.
//!
//! Separate from `log`: when enabled, the trace gets exactly one line per call,
//! written before the call returns, whatever `RUST_LOG` says.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::rc::Rc;

use crate::error::ConfigError;

#[derive(Default)]
pub struct TraceSink {
    out: Option<Box<dyn Write>>,
}

impl fmt::Debug for TraceSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceSink(enabled: {})", self.out.is_some())
    }
}

impl TraceSink {
    pub fn disabled() -> Self {
        Self { out: None }
    }

    pub fn to_writer(writer: impl Write + 'static) -> Self {
        Self {
            out: Some(Box::new(writer)),
        }
    }

    /// `-` traces to stdout, anything else is a file path that gets truncated.
    pub fn open(dest: &str) -> Result<Self, ConfigError> {
        if dest == "-" {
            return Ok(Self::to_writer(io::stdout()));
        }

        let file = File::create(dest).map_err(|source| ConfigError::TraceOpen {
            path: dest.to_string(),
            source,
        })?;
        Ok(Self::to_writer(LineWriter::new(file)))
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Some(out) = self.out.as_mut() {
            if let Err(e) = writeln!(out, "{}", args) {
                log::warn!("[trace] write failed: {e}");
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(out) = self.out.as_mut() {
            let _ = out.flush();
        }
    }
}

/// Formats only when the sink is enabled.
macro_rules! vpi_trace {
    ($sink:expr, $($arg:tt)*) => {
        if $sink.is_enabled() {
            $sink.emit(format_args!($($arg)*));
        }
    };
}
pub(crate) use vpi_trace;

/// Shared in-memory trace destination. Clones write to the same buffer.
#[derive(Clone, Debug, Default)]
pub struct TraceBuffer {
    inner: Rc<RefCell<Vec<u8>>>,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl Write for TraceBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_one_line_each() {
        let buf = TraceBuffer::new();
        let mut sink = TraceSink::to_writer(buf.clone());
        vpi_trace!(sink, "vpi_get({}, {}) --> {}", "#1", "vpiSize", 8);
        vpi_trace!(sink, "vpi_free_object(#2)");
        assert_eq!(buf.lines(), vec!["vpi_get(#1, vpiSize) --> 8", "vpi_free_object(#2)"]);
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let mut sink = TraceSink::disabled();
        assert!(!sink.is_enabled());
        vpi_trace!(sink, "nothing");
    }

    #[test]
    fn test_open_bad_path() {
        let err = TraceSink::open("/nonexistent-dir/trace.log").unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/trace.log"));
    }
}
