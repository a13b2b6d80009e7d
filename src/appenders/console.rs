//! Console appender implementation

use crate::core::{Appender, LogEntry, LogLevel, OutputFormat, Result, TimestampFormat};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    stderr_only: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            stderr_only: false,
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use subsystem_logger::appenders::ConsoleAppender;
    /// use subsystem_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Send every level to stderr instead of splitting by severity
    #[must_use]
    pub fn stderr_only(mut self) -> Self {
        self.stderr_only = true;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, entry: &LogEntry) -> String {
        if !self.use_colors {
            return self.output_format.format(entry, &self.timestamp_format);
        }

        let level_str = format!("{:5}", entry.level.to_str())
            .color(entry.level.color_code())
            .to_string();

        OutputFormat::text_line(
            entry,
            self.timestamp_format.format(&entry.timestamp),
            level_str,
            OutputFormat::source_label(entry).bold(),
        )
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Json | OutputFormat::Logfmt => {
                self.output_format.format(entry, &self.timestamp_format)
            }
        };

        // Route Error and Fatal levels to stderr, others to stdout
        match entry.level {
            _ if self.stderr_only => writeln!(std::io::stderr(), "{}", output)?,
            LogLevel::Error | LogLevel::Fatal => writeln!(std::io::stderr(), "{}", output)?,
            _ => writeln!(std::io::stdout(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_matches_output_format() {
        let appender = ConsoleAppender::with_colors(false);
        let entry =
            LogEntry::new(LogLevel::Warn, "slow peer".to_string()).with_logger_name("net.tcp");

        let line = appender.format_text(&entry);
        assert!(line.contains("[WARN ] net.tcp - slow peer"));
    }

    #[test]
    fn test_append_and_flush() {
        let mut appender = ConsoleAppender::with_colors(false).with_output_format(OutputFormat::Logfmt);
        let entry = LogEntry::new(LogLevel::Info, "hello".to_string());

        appender.append(&entry).unwrap();
        appender.flush().unwrap();
        assert_eq!(appender.name(), "console");
    }
}
