use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    ConfigParseError,
    MalformedLine,
    SelfLoop,
    NodeNotFound,
    UndefinedCentralization,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::ConfigParseError => "E1002",
            Self::MalformedLine => "E1003",
            Self::SelfLoop => "E1004",
            Self::NodeNotFound => "E2001",
            Self::UndefinedCentralization => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Edge list could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedLine => "Malformed edge-list line",
            Self::SelfLoop => "Self-loop edge",
            Self::NodeNotFound => "Node not found",
            Self::UndefinedCentralization => "Centralization undefined",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the path, read permissions and UTF-8 encoding."),
            Self::ConfigParseError => Some("Fix syntax in meshstat.toml and retry."),
            Self::MalformedLine => {
                Some("Each data line needs a source token: `source[,target]` or `source target`.")
            }
            Self::SelfLoop => Some("Remove lines whose source and target name the same node."),
            Self::NodeNotFound => None,
            Self::UndefinedCentralization => {
                Some("Freeman centralization needs a graph with at least 3 nodes.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a data line could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssue {
    /// The line holds nothing but whitespace.
    #[error("blank line has no source token")]
    BlankLine,
    /// The first field is empty, e.g. `,B`.
    #[error("missing source token")]
    MissingSource,
}

/// Errors from loading an edge list.
///
/// A failed load never modifies the target [`crate::graph::Graph`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file could not be opened.
    #[error("cannot open edge list {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading a line failed (I/O error or invalid UTF-8).
    #[error("failed to read edge list at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    /// A data line has no parseable token structure.
    #[error("line {line}: {issue}")]
    Parse { line: usize, issue: ParseIssue },
    /// A data line connects a node to itself.
    #[error("line {line}: self-loop on node `{node}`")]
    SelfLoop { line: usize, node: String },
}

impl LoadError {
    /// 1-based line number the error refers to, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Open { .. } => None,
            Self::Read { line, .. } | Self::Parse { line, .. } | Self::SelfLoop { line, .. } => {
                Some(*line)
            }
        }
    }

    /// Stable error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } | Self::Read { .. } => ErrorCode::InputUnreadable,
            Self::Parse { .. } => ErrorCode::MalformedLine,
            Self::SelfLoop { .. } => ErrorCode::SelfLoop,
        }
    }
}

/// Errors from metric computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// Freeman centralization divides by `(n-1)(n-2)`, which is not
    /// positive below three nodes.
    #[error("freeman centralization is undefined for {node_count} node(s); at least 3 are required")]
    UndefinedCentralization { node_count: usize },
}

impl MetricError {
    /// Stable error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UndefinedCentralization { .. } => ErrorCode::UndefinedCentralization,
        }
    }
}
