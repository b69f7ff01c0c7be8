//! Clipboard writers and the copy-with-fallback policy.

use std::io::Write;
use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ClipboardError;
use crate::toast::Toast;

/// Something that can put text on a clipboard.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Copies `text` with `primary`, falling back to `fallback` once.
///
/// The outcome is reported as a toast, never as an error.
pub async fn copy_to_clipboard(
    primary: &dyn ClipboardWriter,
    fallback: &dyn ClipboardWriter,
    text: &str,
) -> Toast {
    match primary.write_text(text).await {
        Ok(()) => {
            debug!(writer = primary.name(), bytes = text.len(), "Copied to clipboard");
            return Toast::success("Copied to clipboard");
        }
        Err(e) => {
            warn!(writer = primary.name(), error = %e, "Clipboard write failed, trying fallback");
        }
    }

    match fallback.write_text(text).await {
        Ok(()) => {
            debug!(writer = fallback.name(), bytes = text.len(), "Copied with fallback");
            Toast::success("Copied")
        }
        Err(e) => {
            warn!(writer = fallback.name(), error = %e, "Fallback clipboard write failed");
            Toast::error("Copy failed")
        }
    }
}

/// Pipes text into a clipboard command such as `wl-copy` or `pbcopy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn wl_copy() -> Self {
        Self::new("wl-copy", Vec::<String>::new())
    }

    pub fn xclip() -> Self {
        Self::new("xclip", ["-selection", "clipboard"])
    }

    pub fn pbcopy() -> Self {
        Self::new("pbcopy", Vec::<String>::new())
    }

    /// Picks the usual command for the current platform and session.
    pub fn detect() -> Self {
        let wayland = std::env::var("WAYLAND_DISPLAY").ok();
        Self::detect_from(cfg!(target_os = "macos"), wayland.as_deref())
    }

    fn detect_from(macos: bool, wayland_display: Option<&str>) -> Self {
        if macos {
            Self::pbcopy()
        } else if wayland_display.is_some_and(|d| !d.is_empty()) {
            Self::wl_copy()
        } else {
            Self::xclip()
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ClipboardWriter for CommandClipboard {
    fn name(&self) -> &str {
        &self.program
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        use tokio::io::AsyncWriteExt;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ClipboardError::Exit {
                command: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Sets the clipboard through the terminal with an OSC 52 escape sequence.
///
/// Works over SSH and inside multiplexers that pass OSC 52 through, where no
/// clipboard command is reachable.
pub struct Osc52Clipboard<W> {
    writer: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

#[async_trait]
impl<W: Write + Send> ClipboardWriter for Osc52Clipboard<W> {
    fn name(&self) -> &str {
        "osc52"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let sequence = osc52_sequence(text);
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("clipboard writer lock poisoned"))?;
        writer.write_all(sequence.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
