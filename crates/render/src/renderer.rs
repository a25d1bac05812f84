use std::io::{self, Stderr, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use chatdash_core::Page;
use chatdash_pager::PageRenderer;
use serde::Serialize;

use crate::error::Result;
use crate::rows::{TableRow, page_table};
use crate::table::{Table, html_escape};

/// How tables are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

/// Writes pages and errors to a pair of sinks (stdout/stderr by default).
pub struct TableRenderer<W = Stdout, E = Stderr> {
    format: OutputFormat,
    out: Mutex<W>,
    err: Mutex<E>,
}

impl TableRenderer {
    #[must_use]
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(format, io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> TableRenderer<W, E> {
    pub const fn new(format: OutputFormat, out: W, err: E) -> Self {
        Self { format, out: Mutex::new(out), err: Mutex::new(err) }
    }

    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes `table` in this renderer's text or HTML form.
    ///
    /// # Errors
    /// Returns `RenderError::Io` when the sink rejects the write.
    pub fn write_table(&self, table: &Table) -> Result<()> {
        let body = match self.format {
            OutputFormat::Html => table.to_html(),
            OutputFormat::Text | OutputFormat::Json => table.to_text(),
        };
        self.write_out(body.as_bytes())
    }

    /// Writes any serializable value as pretty JSON.
    ///
    /// # Errors
    /// Returns `RenderError::Json` or `RenderError::Io`.
    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let mut body = serde_json::to_string_pretty(value)?;
        body.push('\n');
        self.write_out(body.as_bytes())
    }

    /// Writes `value` as JSON in `Json` mode, otherwise `table`.
    ///
    /// # Errors
    /// As [`Self::write_table`] and [`Self::write_json`].
    pub fn write_records<T: Serialize + ?Sized>(&self, value: &T, table: impl FnOnce() -> Table) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(value),
            OutputFormat::Text | OutputFormat::Html => self.write_table(&table()),
        }
    }

    /// Writes a free-form line (status messages, analysis text).
    ///
    /// # Errors
    /// Returns `RenderError::Io` when the sink rejects the write.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let body = match self.format {
            OutputFormat::Html => format!("<p>{}</p>\n", html_escape(line)),
            OutputFormat::Text | OutputFormat::Json => format!("{line}\n"),
        };
        self.write_out(body.as_bytes())
    }

    /// Writes an error message to the error sink.
    ///
    /// # Errors
    /// Returns `RenderError::Io` when the sink rejects the write.
    pub fn write_error(&self, message: &str) -> Result<()> {
        let mut err = self.err.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(err, "error: {message}")?;
        err.flush()?;
        Ok(())
    }

    fn write_out(&self, bytes: &[u8]) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(bytes)?;
        out.flush()?;
        Ok(())
    }
}

impl<T, W, E> PageRenderer<T> for TableRenderer<W, E>
where
    T: TableRow + Serialize,
    W: Write + Send,
    E: Write + Send,
{
    fn render(&self, page: &Page<T>) {
        if let Err(e) = self.write_records(page, || page_table(page)) {
            tracing::warn!(error = %e, "failed to write page");
        }
    }

    fn show_error(&self, error: &(dyn std::error::Error + 'static)) {
        if let Err(e) = self.write_error(&error.to_string()) {
            tracing::warn!(error = %e, "failed to write error message");
        }
    }
}

impl<W, E> std::fmt::Debug for TableRenderer<W, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRenderer").field("format", &self.format).finish_non_exhaustive()
    }
}
