mod formatter;
mod json;
mod plain;

use clap::ValueEnum;

pub(crate) use formatter::ReportFormatter;
pub(crate) use json::JsonFormatter;
pub(crate) use plain::PlainTextFormatter;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Human readable text
    #[default]
    Plain,
    /// A single JSON document
    Json,
}

impl OutputFormat {
    pub(crate) fn formatter(self) -> Box<dyn ReportFormatter> {
        match self {
            Self::Plain => Box::new(PlainTextFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}

/// Error message with all of its causes on one line.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
