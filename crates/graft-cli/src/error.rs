//! Error types for the `graft` binary.
//!
//! [`CliError`] wraps every failure mode of a run so `main` can propagate
//! with `?`.

/// Top-level error for the `graft` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: graft_merge::ConfigError,
    },

    /// Reading or writing content documents failed.
    #[error("content error: {source}")]
    Content {
        /// The underlying content error.
        #[from]
        source: graft_content::ContentError,
    },

    /// The merge stopped on a descriptor failure.
    #[error("merge error: {source}")]
    Merge {
        /// The underlying merge error.
        #[from]
        source: graft_merge::MergeError,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
