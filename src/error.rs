//! Error types for parsing and remote calls.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors while loading a source document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Markdown file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Markdown file is not valid UTF-8: {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from an XML-RPC round trip
#[derive(Error, Debug)]
pub enum XmlRpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Malformed XML-RPC response: {0}")]
    Malformed(String),

    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },
}
