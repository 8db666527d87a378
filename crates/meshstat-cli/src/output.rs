//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for scripts, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in `meshstat.toml`, then in the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Resolution itself lives in `meshstat_core::config::resolve_config`.

use clap::ValueEnum;
use meshstat_core::error::{ErrorCode, LoadError, MetricError};
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned values).
    Pretty,
    /// Plain `key value` lines for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Canonical name, as accepted by `--format` and config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Parse a canonical mode name produced by config resolution.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Render a serializable value with explicit text and pretty renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_mode(&mut out, mode, value, text_fn, pretty_fn)
}

fn write_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1003").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Short summary of the error class behind `error_code`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CliError {
    /// Create an error carrying a stable code and its hint.
    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
            kind: Some(code.message().to_string()),
        }
    }
}

impl From<&LoadError> for CliError {
    fn from(err: &LoadError) -> Self {
        Self::with_code(err.error_code(), err.to_string())
    }
}

impl From<&MetricError> for CliError {
    fn from(err: &MetricError) -> Self {
        Self::with_code(err.error_code(), err.to_string())
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshstat_core::error::ParseIssue;

    fn capture_error(mode: OutputMode, error: &CliError) -> String {
        let mut buf = Vec::new();
        write_error(&mut buf, mode, error).expect("write to buffer");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [OutputMode::Pretty, OutputMode::Text, OutputMode::Json] {
            assert_eq!(OutputMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(OutputMode::from_name("fancy"), None);
    }

    #[test]
    fn pretty_kv_aligns_keys() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "nodes", "5").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "nodes:           5\n");
    }

    #[test]
    fn write_mode_dispatches() {
        #[derive(Serialize)]
        struct Payload {
            nodes: usize,
        }
        let payload = Payload { nodes: 3 };

        let mut json = Vec::new();
        write_mode(&mut json, OutputMode::Json, &payload, |_, _| Ok(()), |_, _| Ok(()))
            .expect("json");
        let value: serde_json::Value = serde_json::from_slice(&json).expect("valid json");
        assert_eq!(value["nodes"], 3);

        let mut text = Vec::new();
        write_mode(
            &mut text,
            OutputMode::Text,
            &payload,
            |p, w| writeln!(w, "nodes {}", p.nodes),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("text");
        assert_eq!(String::from_utf8(text).expect("utf8"), "nodes 3\n");
    }

    #[test]
    fn load_error_maps_to_code_and_hint() {
        let err = LoadError::Parse {
            line: 3,
            issue: ParseIssue::BlankLine,
        };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1003"));
        assert!(cli.message.contains("line 3"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn metric_error_maps_to_code() {
        let cli = CliError::from(&MetricError::UndefinedCentralization { node_count: 1 });
        assert_eq!(cli.error_code.as_deref(), Some("E3001"));
        assert_eq!(cli.kind.as_deref(), Some("Centralization undefined"));
        assert!(cli.message.contains("1 node(s)"));
    }

    #[test]
    fn human_error_includes_code_and_suggestion() {
        let err = CliError::with_code(ErrorCode::SelfLoop, "line 2: self-loop on node `A`");
        let rendered = capture_error(OutputMode::Pretty, &err);
        assert!(rendered.starts_with("error[E1004]: line 2"));
        assert!(rendered.contains("suggestion:"));
    }

    #[test]
    fn json_error_is_wrapped() {
        let err = CliError::with_code(ErrorCode::NodeNotFound, "node `x` not found");
        let rendered = capture_error(OutputMode::Json, &err);
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["error"]["error_code"], "E2001");
        assert_eq!(value["error"]["kind"], "Node not found");
        assert!(value["error"].get("suggestion").is_none());
    }
}
