//! Helpers for classifying parse outcomes.

use super::FlagError;

impl FlagError {
    /// Returns `true` when the error is a help or version request.
    ///
    /// These sentinels travel through the error channel so normal flow stops,
    /// but callers usually print the payload and exit successfully.
    #[must_use]
    pub const fn is_display_request(&self) -> bool {
        matches!(self, Self::HelpRequested(_) | Self::VersionRequested(_))
    }

    /// Rendered help or version text carried by a display request.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        match self {
            Self::HelpRequested(text) | Self::VersionRequested(text) => Some(text.as_str()),
            _ => None,
        }
    }
}
