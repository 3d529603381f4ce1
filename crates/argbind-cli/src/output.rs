//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for match results and compiled schemas.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use argbind_core::{Binding, Bindings, ErrorKind, Schema, SlotKind};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Outcome of matching one argument list, as written by `check`
#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<&'a Bindings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl<'a> MatchReport<'a> {
    pub fn from_result(result: &'a argbind_core::Result<Bindings>) -> Self {
        match result {
            Ok(bindings) => Self {
                matched: true,
                bindings: Some(bindings),
                error: None,
            },
            Err(error) => Self {
                matched: false,
                bindings: None,
                error: Some(ErrorReport::from(error)),
            },
        }
    }
}

/// A matching error in machine-readable form
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
}

impl From<&argbind_core::Error> for ErrorReport {
    fn from(error: &argbind_core::Error) -> Self {
        Self {
            kind: error.kind(),
            key: error.key().map(str::to_string),
            message: error.to_string(),
        }
    }
}

/// One compiled slot, as written by `explain`
#[derive(Debug, Serialize)]
pub struct SlotReport {
    pub key: String,
    pub kind: SlotKind,
    pub name: String,
    pub label: String,
    pub validator: String,
}

impl SlotReport {
    pub fn from_schema(schema: &Schema) -> Vec<Self> {
        schema
            .slots()
            .iter()
            .map(|slot| Self {
                key: slot.key.clone(),
                kind: slot.kind,
                name: slot.name.clone(),
                label: slot.label(),
                validator: slot.validator.describe(),
            })
            .collect()
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the outcome of a match
    fn format_match_report(&self, report: &MatchReport<'_>) -> Result<String>;

    /// Format compiled slots
    fn format_slots(&self, slots: &[SlotReport]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_match_report(&self, report: &MatchReport<'_>) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_match_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_slots(&self, slots: &[SlotReport]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_slots_human(slots)),
            _ => self.format(&slots),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write the outcome of a match
    pub fn match_report(&mut self, report: &MatchReport<'_>) -> Result<()> {
        if let Some(bindings) = report.bindings {
            trace!(
                "Outputting bindings: {}",
                redaction::redacted(&argbind_core::json::bindings_to_json(bindings))
            );
        }

        if self.is_human() {
            return match (report.bindings, &report.error) {
                (Some(bindings), _) => {
                    self.success("✓ Arguments match the schema")?;
                    let rows = binding_rows(bindings);
                    self.table(&["Name", "Binding"], rows)
                }
                (None, Some(error)) => self.error(&format!("✗ {}", error.message)),
                (None, None) => Ok(()),
            };
        }

        let formatted = self.format.format_match_report(report)?;
        self.writeln(&formatted)
    }

    /// Write compiled schema slots
    pub fn slots(&mut self, slots: &[SlotReport]) -> Result<()> {
        if self.is_human() {
            let rows = slots
                .iter()
                .map(|slot| {
                    vec![
                        slot.key.clone(),
                        slot.kind.to_string(),
                        slot.name.clone(),
                        slot.label.clone(),
                        slot.validator.clone(),
                    ]
                })
                .collect();
            return self.table(&["Key", "Kind", "Name", "Label", "Accepts"], rows);
        }

        let formatted = self.format.format_slots(slots)?;
        self.writeln(&formatted)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        let widths = column_widths(headers, &rows);
        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn binding_rows(bindings: &Bindings) -> Vec<Vec<String>> {
    bindings
        .iter()
        .map(|(name, binding)| vec![name.to_string(), describe_binding(binding)])
        .collect()
}

/// Render a binding for a table cell
fn describe_binding(binding: &Binding) -> String {
    match binding {
        Binding::Absent => "(absent)".to_string(),
        Binding::Value(value) => value.to_string(),
        Binding::Spread(values) => format!(
            "[{}]",
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Format a match report for human reading, without color
fn format_match_report_human(report: &MatchReport<'_>) -> String {
    let mut output = String::new();

    match (report.bindings, &report.error) {
        (Some(bindings), _) => {
            output.push_str("✓ Arguments match the schema\n");
            for (name, binding) in bindings.iter() {
                output.push_str(&format!("  {} = {}\n", name, describe_binding(binding)));
            }
        }
        (None, Some(error)) => {
            output.push_str(&format!("✗ {}\n", error.message));
            if let Some(key) = &error.key {
                output.push_str(&format!("  Key: {}\n", key));
            }
        }
        (None, None) => {}
    }

    output
}

/// Format compiled slots for human reading, without color
fn format_slots_human(slots: &[SlotReport]) -> String {
    let mut output = String::new();
    for (i, slot) in slots.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} ({}) -> {}: {}\n",
            i + 1,
            slot.key,
            slot.kind,
            slot.name,
            slot.validator
        ));
    }
    output
}
