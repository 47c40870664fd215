use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Why a single frame line could not be turned into a record.
#[derive(Error, Debug)]
pub enum ParseCause {
    #[error("missing {0} token")]
    MissingToken(&'static str),
    #[error("invalid {field}: {source}")]
    InvalidInt {
        field: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid {field}: {source}")]
    InvalidFloat {
        field: &'static str,
        #[source]
        source: ParseFloatError,
    },
    #[error("timestamp out of range")]
    TimestampOverflow,
    #[error("line too short for LCW column {0}")]
    MissingLcwColumn(usize),
    #[error("not a VOC frame")]
    NotVoiceFrame,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IO(String),
    #[error("failed to parse line \"{line}\": {cause}")]
    Parse {
        line: String,
        #[source]
        cause: ParseCause,
    },
    #[error("expected iridium-parser output, found raw iridium-extractor data: \"{line}\"")]
    PipelineMismatch { line: String },
    #[error("unknown voice payload format: {payload} ({reason})")]
    Decode { payload: String, reason: String },
    #[error("config: {0}")]
    Config(String),
}

impl AppError {
    pub(crate) fn parse(line: &str, cause: ParseCause) -> Self {
        AppError::Parse { line: line.to_string(), cause }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::IO(format!("{}", e)) }
}
