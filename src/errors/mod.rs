//! Unified error handling with a consistent JSON output envelope.

use serde::Serialize;

use crate::parsers::ParseError;

/// Error detail in the output envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for everything the plugin reports to its host.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

impl Envelope<()> {
    /// Envelope for a failed plugin run.
    pub fn from_error(err: &PluginError) -> Self {
        Self::error(err.code(), &err.to_string())
    }
}

/// Plugin error type surfaced to the host application.
///
/// A report that is not ready yet and failed DNS lookups are not errors;
/// they are absorbed where they happen.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Malformed line {}: {}", .0.line, .0.message)]
    MalformedLine(ParseError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Asset store error: {0}")]
    Store(String),
}

impl PluginError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedLine(_) => "MALFORMED_LINE",
            Self::Io { .. } => "IO_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether the error only affects a single report line.
    pub fn is_line_error(&self) -> bool {
        matches!(self, Self::MalformedLine(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success() {
        let envelope = Envelope::success("hello");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"], "hello");
        assert!(json["error"].is_null());
    }

    #[test]
    fn envelope_error() {
        let envelope = Envelope::<()>::error("IO_ERROR", "report unreadable");
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "IO_ERROR");
        assert_eq!(json["error"]["message"], "report unreadable");
    }

    #[test]
    fn envelope_from_plugin_error() {
        let err = PluginError::Config("unknown scan type: dns".to_string());
        let json = serde_json::to_value(Envelope::from_error(&err)).unwrap();
        assert_eq!(json["error"]["code"], "CONFIG_ERROR");
        assert_eq!(
            json["error"]["message"],
            "Configuration error: unknown scan type: dns"
        );
    }

    #[test]
    fn malformed_line_display() {
        let err = PluginError::MalformedLine(ParseError {
            line: 3,
            message: "expected hostname and address".to_string(),
        });
        assert!(err.is_line_error());
        assert_eq!(err.to_string(), "Malformed line 3: expected hostname and address");
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PluginError::io("/tmp/run1/report.txt", source);
        assert!(!err.is_line_error());
        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.to_string().contains("/tmp/run1/report.txt"));
    }
}
