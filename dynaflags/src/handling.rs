//! What `parse` does with a failure once every pass has run.

use crate::error::FlagError;

/// Exit status for usage errors under [`ErrorHandling::ExitOnError`].
pub const EXIT_CODE_USAGE: i32 = 2;

/// Exit status after printing help or version text.
pub const EXIT_CODE_SUCCESS: i32 = 0;

/// Error policy for [`crate::FlagSet::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Print `Error: <message>` and exit with status 2.
    ///
    /// Help and version requests print their text and exit with status 0.
    ExitOnError,
    /// Panic with the error message. Help and version requests are
    /// returned, as they are not failures.
    PanicOnError,
}

/// The action chosen for one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Disposition {
    Return,
    Exit { code: i32, message: String },
    Panic(String),
}

pub(crate) fn dispose(policy: ErrorHandling, err: &FlagError) -> Disposition {
    match (policy, err.display_text()) {
        (ErrorHandling::ContinueOnError, _) | (ErrorHandling::PanicOnError, Some(_)) => {
            Disposition::Return
        }
        (ErrorHandling::ExitOnError, Some(text)) => Disposition::Exit {
            code: EXIT_CODE_SUCCESS,
            message: text.to_owned(),
        },
        (ErrorHandling::ExitOnError, None) => Disposition::Exit {
            code: EXIT_CODE_USAGE,
            message: format!("Error: {err}\n"),
        },
        (ErrorHandling::PanicOnError, None) => Disposition::Panic(err.to_string()),
    }
}
