//! Client side of the phrasebook: the session that drives the phrase API,
//! clipboard writers and transient toast feedback.

pub mod api;
pub mod clipboard;
pub mod error;
pub mod session;
pub mod toast;

pub use api::{HttpPhraseApi, PhraseApi};
pub use clipboard::{copy_to_clipboard, ClipboardWriter, CommandClipboard, Osc52Clipboard};
pub use error::{ClientError, ClipboardError};
pub use session::Session;
pub use toast::{Notifier, Toast, ToastKind, TracingNotifier};
