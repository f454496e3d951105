//! JSON-lines report sink.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::error::ReportError;
use crate::monitor::Report;
use crate::traits::Reporter;

/// Writes each report as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesReporter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesReporter<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Reporter for JsonLinesReporter<W> {
    fn report(&self, report: &Report) -> Result<(), ReportError> {
        let line = serde_json::to_string(report).map_err(|e| ReportError::Serialization {
            message: e.to_string(),
        })?;

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")
            .and_then(|()| writer.flush())
            .map_err(|e| ReportError::Failed {
                message: e.to_string(),
            })
    }
}
