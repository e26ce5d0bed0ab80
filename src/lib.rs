//! Controller for a multi-step quote request form.
//!
//! [`QuoteWizard`] parses the form markup into an in-memory document, binds the
//! structural roles it needs (steps, navigation triggers, progress bar, interest
//! choice, radio cards) and then reacts to user actions the way the page script
//! would: navigating between steps, toggling the conditional sections,
//! highlighting radio cards, validating required fields and handling the final
//! submission.
//!
//! ```
//! use quote_wizard::QuoteWizard;
//!
//! let html = r#"
//! <form id="quote-form">
//!   <div class="form-step">
//!     <input id="name" name="name" required>
//!     <button type="button" class="btn-next">Next</button>
//!   </div>
//!   <div class="form-step">
//!     <button type="button" class="btn-prev">Back</button>
//!     <button id="send" type="submit">Send</button>
//!   </div>
//! </form>
//! <div id="progress-bar"></div>
//! "#;
//!
//! let mut wizard = QuoteWizard::from_html(html)?;
//! wizard.click(".btn-next")?;
//! assert_eq!(wizard.current_step(), 0);
//!
//! wizard.type_text("#name", "Ada")?;
//! wizard.click(".btn-next")?;
//! assert_eq!(wizard.current_step(), 1);
//! assert_eq!(wizard.progress_width().as_deref(), Some("100%"));
//! # Ok::<(), quote_wizard::Error>(())
//! ```

use std::error::Error as StdError;
use std::fmt;

mod config;
mod dom;
mod events;
mod form_controls;
mod html;
mod selector;
mod state;
mod submission;
mod trace;
mod wizard;

pub use config::{ClassVocabulary, WizardConfig};
pub use events::{ElementRole, EventKind};
pub use state::WizardState;
pub use submission::{LogSink, SubmissionPayload, SubmissionSink};
pub use wizard::QuoteWizard;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    MissingElement(String),
    DomOperation(String),
    InvalidConfig(String),
    StepOutOfRange {
        index: usize,
        count: usize,
    },
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::MissingElement(what) => write!(f, "form structure is missing {what}"),
            Self::DomOperation(msg) => write!(f, "dom operation failed: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid wizard config: {msg}"),
            Self::StepOutOfRange { index, count } => {
                write!(f, "step index {index} is out of range for {count} steps")
            }
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
