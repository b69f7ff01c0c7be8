//! Errors from the phrase API client and the clipboard writers.

use serde::Deserialize;
use thiserror::Error;

/// Errors from talking to the phrase API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ClientError {
    /// Text suitable for a toast.
    ///
    /// For error responses this is the server's `message` field when the body
    /// is the usual JSON error shape, otherwise the raw body.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status { status, body } => {
                match serde_json::from_str::<ErrorBody>(body) {
                    Ok(parsed) => parsed.message,
                    Err(_) if body.is_empty() => format!("HTTP {}", status),
                    Err(_) => body.clone(),
                }
            }
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Http(err) => err.to_string(),
        }
    }
}

/// Errors from writing to a clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to start clipboard command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard command '{command}' exited with {status}")]
    Exit { command: String, status: String },

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_from_json_body() {
        let error = ClientError::Status {
            status: 400,
            body: r#"{"error":"validation_error","message":"Missing id"}"#.to_string(),
        };
        assert_eq!(error.user_message(), "Missing id");
    }

    #[test]
    fn test_user_message_from_plain_body() {
        let error = ClientError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(error.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_user_message_empty_body() {
        let error = ClientError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(error.user_message(), "HTTP 500");
    }

    #[test]
    fn test_status_display() {
        let error = ClientError::Status {
            status: 405,
            body: "nope".to_string(),
        };
        assert_eq!(error.to_string(), "Server returned 405: nope");
    }

    #[test]
    fn test_clipboard_exit_display() {
        let error = ClipboardError::Exit {
            command: "xclip".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Clipboard command 'xclip' exited with exit status: 1"
        );
    }
}
