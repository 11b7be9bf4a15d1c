//! Diagnostics produced by the grit parsing runtime.
//!
//! - [`Diagnostic`], [`Label`]: structured error reports with spans
//! - [`ErrorCode`]: searchable codes, `E1xxx` for syntax errors the parser
//!   recovers from and `E9xxx` for grammar or engine defects that abort a parse
//! - [`Message`] / [`MessageRenderer`]: every user-facing text goes through a
//!   renderer so messages can be localized without touching the runtime

mod diagnostic;
mod error_code;
mod message;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use message::{EnglishMessages, Message, MessageRenderer};
