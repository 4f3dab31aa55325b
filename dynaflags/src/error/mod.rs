//! Error types produced while declaring, parsing and validating flags.

mod helpers;
mod types;

pub use types::{FlagError, ValueError};

#[cfg(test)]
mod tests;
