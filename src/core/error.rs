//! Error handling for BWC
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`BwcError`]) so callers can branch on the failure
//! 2. **User-friendly messages** ([`ErrorContext`]) carrying a literal remediation
//!    command wherever one is known
//!
//! # Propagation policy
//!
//! - Prerequisite and configuration errors abort the current operation.
//! - Integration errors ([`BwcError::IntegrationCommandFailed`]) are recoverable:
//!   the reconciler degrades to printing manual configuration instead.
//! - Parse errors on authoritative state (`.mcp.json`, the BWC config) are fatal;
//!   catalog text is parsed best-effort and never produces an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bwc_cli::core::{BwcError, user_friendly_error};
//!
//! let err = anyhow::Error::from(BwcError::ClaudeCliNotFound);
//! let ctx = user_friendly_error(err);
//! ctx.display(); // red error, yellow details, green suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for BWC operations.
#[derive(Error, Debug)]
pub enum BwcError {
    /// No config file exists at the resolved location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound {
        /// Path that was expected to hold the config
        path: String,
    },

    /// `bwc init` was run without `--force` over an existing config.
    #[error("Configuration already exists at {path}")]
    ConfigAlreadyExists {
        /// Path of the existing config
        path: String,
    },

    /// The BWC config file is not valid JSON or has the wrong shape.
    #[error("Failed to parse configuration {file}: {reason}")]
    ConfigParseError {
        /// Config file path
        file: String,
        /// Parser message
        reason: String,
    },

    /// A required external tool (docker, npm, git, gh) is not available.
    #[error("Required tool '{tool}' is not installed or not responding")]
    PrerequisiteMissing {
        /// Tool name as invoked
        tool: String,
    },

    /// Every probe for the Claude CLI binary failed.
    #[error("Claude CLI not found")]
    ClaudeCliNotFound,

    /// `--scope` was not one of `local`, `user`, `project`.
    #[error("Invalid scope '{value}'. Must be one of: local, user, project")]
    InvalidScope {
        /// The rejected value
        value: String,
    },

    /// The server descriptor offers no installation method that can be used.
    #[error("No installation method available for MCP server '{server}'")]
    NoInstallMethodAvailable {
        /// Server name
        server: String,
    },

    /// A convenience integration command (usually `claude mcp add`) failed.
    #[error("Integration command failed: {command}: {reason}")]
    IntegrationCommandFailed {
        /// Command line that was attempted
        command: String,
        /// Failure reason
        reason: String,
    },

    /// A config entry names a provider BWC does not know how to verify.
    #[error("Unknown provider '{provider}'")]
    UnknownProvider {
        /// Provider string from the config entry
        provider: String,
    },

    /// A removal target was absent in an external store.
    ///
    /// Reported for information only; removal treats it as success.
    #[error("'{name}' was not found in {store}")]
    NotFoundRemotely {
        /// Server name
        name: String,
        /// Store that was consulted
        store: String,
    },

    /// Malformed JSON in an authoritative file.
    #[error("Failed to parse {source_name}: {reason}")]
    ParseError {
        /// What was being parsed (usually a path)
        source_name: String,
        /// Parser message
        reason: String,
    },

    /// MCP server name is not in the registry.
    #[error("MCP server '{name}' not found in registry")]
    ServerNotFound {
        /// Requested name
        name: String,
        /// Closest registry names
        suggestions: Vec<String>,
    },

    /// Subagent or command name is not in the registry.
    #[error("{resource_type} '{name}' not found in registry")]
    ResourceNotFound {
        /// `subagent` or `command`
        resource_type: String,
        /// Requested name
        name: String,
    },

    /// A required external command exited non-zero.
    #[error("Command failed: {command}")]
    ProcessFailed {
        /// Command line
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Registry download failed.
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being fetched
        operation: String,
        /// Underlying error text
        reason: String,
    },

    /// I/O error from the standard library.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for BwcError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::ConfigAlreadyExists {
                path,
            } => Self::ConfigAlreadyExists {
                path: path.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::PrerequisiteMissing {
                tool,
            } => Self::PrerequisiteMissing {
                tool: tool.clone(),
            },
            Self::ClaudeCliNotFound => Self::ClaudeCliNotFound,
            Self::InvalidScope {
                value,
            } => Self::InvalidScope {
                value: value.clone(),
            },
            Self::NoInstallMethodAvailable {
                server,
            } => Self::NoInstallMethodAvailable {
                server: server.clone(),
            },
            Self::IntegrationCommandFailed {
                command,
                reason,
            } => Self::IntegrationCommandFailed {
                command: command.clone(),
                reason: reason.clone(),
            },
            Self::UnknownProvider {
                provider,
            } => Self::UnknownProvider {
                provider: provider.clone(),
            },
            Self::NotFoundRemotely {
                name,
                store,
            } => Self::NotFoundRemotely {
                name: name.clone(),
                store: store.clone(),
            },
            Self::ParseError {
                source_name,
                reason,
            } => Self::ParseError {
                source_name: source_name.clone(),
                reason: reason.clone(),
            },
            Self::ServerNotFound {
                name,
                suggestions,
            } => Self::ServerNotFound {
                name: name.clone(),
                suggestions: suggestions.clone(),
            },
            Self::ResourceNotFound {
                resource_type,
                name,
            } => Self::ResourceNotFound {
                resource_type: resource_type.clone(),
                name: name.clone(),
            },
            Self::ProcessFailed {
                command,
                stderr,
            } => Self::ProcessFailed {
                command: command.clone(),
                stderr: stderr.clone(),
            },
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            // io::Error and serde_json::Error are not Clone; keep the message.
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// A [`BwcError`] plus optional details and a remediation suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BwcError,
    /// Actionable remediation, ideally a literal command
    pub suggestion: Option<String>,
    /// Extra explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps an error with no suggestion or details.
    #[must_use]
    pub const fn new(error: BwcError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Adds a suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds details, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with terminal colors.
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

/// Converts any error into an [`ErrorContext`] with remediation where known.
///
/// [`BwcError`]s anywhere in the chain get tailored suggestions. Other errors
/// are reported with their full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(bwc_error) = cause.downcast_ref::<BwcError>() {
            return create_error_context(bwc_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(BwcError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check file ownership and permissions of ~/.bwc and the project directory");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BwcError::Other {
        message,
    })
}

fn create_error_context(error: BwcError) -> ErrorContext {
    match &error {
        BwcError::ConfigNotFound { path } => {
            let details = format!("BWC looked for a project config (bwc.config.json or .bwc/config.json) in the current directory and its parents, then for the global config at {path}");
            ErrorContext::new(error)
                .with_suggestion("Run 'bwc init' to create a global config, or 'bwc init --project' for this project")
                .with_details(details)
        }

        BwcError::ConfigAlreadyExists { .. } => ErrorContext::new(error)
            .with_suggestion("Use 'bwc init --force' to overwrite the existing configuration"),

        BwcError::ConfigParseError { file, .. } => {
            let suggestion = format!("Fix the JSON syntax in {file}, or recreate it with 'bwc init --force'");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        BwcError::PrerequisiteMissing { tool } => {
            let suggestion = match tool.as_str() {
                "docker" | "docker.exe" => "Install Docker Desktop from https://www.docker.com/products/docker-desktop/ and make sure 'docker --version' works".to_string(),
                "npm" => "Install Node.js (which ships npm) from https://nodejs.org/ and make sure 'npm --version' works".to_string(),
                "git" => "Install git from https://git-scm.com/ or your package manager".to_string(),
                "gh" => "Install the GitHub CLI from https://cli.github.com/ and run 'gh auth login'".to_string(),
                other => format!("Install '{other}' and make sure it is on your PATH"),
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        BwcError::ClaudeCliNotFound => ErrorContext::new(error)
            .with_suggestion("npm install -g @anthropic-ai/claude-code")
            .with_details("BWC checked ~/.claude/local/claude, /usr/local/bin, /opt/homebrew/bin, /usr/bin and your PATH"),

        BwcError::InvalidScope { .. } => ErrorContext::new(error)
            .with_suggestion("Pass --scope local, --scope user or --scope project"),

        BwcError::NoInstallMethodAvailable { server } => {
            let suggestion = format!("Check the registry entry for '{server}' or install it manually with 'claude mcp add'");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("The registry entry declares no docker, npm or manual installation method")
        }

        BwcError::IntegrationCommandFailed { command, .. } => {
            let suggestion = format!("Run the command manually: {command}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        BwcError::UnknownProvider { .. } => ErrorContext::new(error)
            .with_suggestion("Edit the entry's provider to 'docker' or 'claude', or reinstall it with 'bwc add --mcp <name>'"),

        BwcError::ParseError { source_name, .. } => {
            let suggestion = format!("Fix the JSON syntax in {source_name}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        BwcError::ServerNotFound { suggestions, .. } => {
            let ctx = ErrorContext::new(error.clone())
                .with_details("Run 'bwc list --mcps' to see installed servers");
            if suggestions.is_empty() {
                ctx
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }

        BwcError::ProcessFailed { stderr, .. } if !stderr.trim().is_empty() => {
            let details = stderr.trim().to_string();
            ErrorContext::new(error).with_details(details)
        }

        BwcError::NetworkError { .. } => ErrorContext::new(error)
            .with_suggestion("Check your internet connection, or HTTPS_PROXY/NO_PROXY if you are behind a proxy"),

        _ => ErrorContext::new(error),
    }
}
