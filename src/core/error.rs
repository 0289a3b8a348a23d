//! Error handling for release-agent
//!
//! Two layers, as everywhere in this crate:
//! - [`DeployError`] - strongly-typed failures the release flow can name
//! - [`ErrorContext`] - a wrapper adding details and a suggestion, used when
//!   the outer retry loop reports a failed run
//!
//! Everything else travels as [`anyhow::Error`] with `.context(...)` attached
//! at the layer boundary. [`user_friendly_error`] recognizes [`DeployError`],
//! [`std::io::Error`] and [`toml::de::Error`] anywhere in the chain and falls
//! back to printing the full chain.
//!
//! Version lookups never produce errors: an unreadable version is `0.0.0` by
//! contract, so there is no variant for it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_agent::core::{DeployError, user_friendly_error};
//!
//! let error = anyhow::Error::from(DeployError::DownloadFailed {
//!     app: "data-sync".to_string(),
//!     attempts: 2,
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The domain failures of a release run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// Every download attempt failed, including the one after stopping the
    /// service. The run is aborted without touching the installed file.
    #[error("Failed to download the latest artifact for '{app}' after {attempts} attempts")]
    DownloadFailed {
        /// Application name
        app: String,
        /// How many downloads were attempted
        attempts: u32,
    },

    /// The repository directory lists no version directories to choose from.
    #[error("No published artifacts found under '{path}'")]
    NoArtifactsFound {
        /// Repository path that was listed
        path: String,
    },

    /// A request to the artifact repository failed.
    #[error("Repository request failed for '{path}': {reason}")]
    RepositoryRequest {
        /// Repository path of the request
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// A service command could not be launched at all.
    #[error("Failed to run service command '{command}': {reason}")]
    ServiceCommand {
        /// The rendered shell command
        command: String,
        /// Underlying failure
        reason: String,
    },

    /// Configuration is present but unusable.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Anything without a more specific variant.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// A [`DeployError`] with optional details and a suggestion for the operator.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DeployError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no details or suggestion yet.
    #[must_use]
    pub const fn new(error: DeployError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// The whole chain is searched, so a [`DeployError`] wrapped in several layers
/// of `.context(...)` is still recognized.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(deploy_error) = cause.downcast_ref::<DeployError>() {
            return create_error_context(deploy_error.clone()).with_details(render_chain(&error));
        }
    }

    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            let suggestion = match io_error.kind() {
                std::io::ErrorKind::PermissionDenied => Some(
                    "Run as a user allowed to write the install path and control the service",
                ),
                std::io::ErrorKind::NotFound => {
                    Some("Check that the configured paths exist and are spelled correctly")
                }
                _ => None,
            };
            if let Some(suggestion) = suggestion {
                return ErrorContext::new(DeployError::Other {
                    message: error.to_string(),
                })
                .with_details(render_chain(&error))
                .with_suggestion(suggestion);
            }
        }

        if let Some(toml_error) = cause.downcast_ref::<toml::de::Error>() {
            return ErrorContext::new(DeployError::ConfigError {
                message: toml_error.to_string(),
            })
            .with_suggestion("Check the TOML syntax of the configuration file")
            .with_details(render_chain(&error));
        }
    }

    ErrorContext::new(DeployError::Other {
        message: render_chain(&error),
    })
}

/// Render `error` followed by its numbered causes.
fn render_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: DeployError) -> ErrorContext {
    let suggestion = match &error {
        DeployError::DownloadFailed { .. } => {
            "The repository could not be read even with the service stopped. Check repository availability and free memory on this host"
        }
        DeployError::NoArtifactsFound { .. } => {
            "Check the project name, channel and application name, and the [repository] path template"
        }
        DeployError::RepositoryRequest { .. } => {
            "Check the repository URL, network access and the API key in the [repository] section"
        }
        DeployError::ServiceCommand { .. } => {
            "Check the [service] stop/start commands and that the shell is available"
        }
        DeployError::ConfigError { .. } => "Fix the configuration file and try again",
        DeployError::Other { .. } => "Run with --verbose for more information",
    };

    ErrorContext::new(error).with_suggestion(suggestion)
}
