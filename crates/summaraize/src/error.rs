//! Error types for SummarAIze.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Expected branches (duplicate paper, citation conflict, rename conflict) are not
//! errors; they are modelled as outcome enums next to the operations that produce them.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the collaborator clients (arXiv, Ollama, PDF tooling).
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The given URL is not a usable paper URL.
    #[error("Invalid paper URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Resource not found (404 or empty feed)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Malformed Atom feed
    #[error("Failed to parse feed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// The local language model runtime is not reachable.
    #[error("Language model runtime unavailable at {endpoint}: {reason}")]
    Unavailable {
        /// Runtime endpoint that was probed
        endpoint: String,
        /// Last failure seen while probing or starting it
        reason: String,
    },

    /// An external helper process failed.
    #[error("Process '{program}' failed: {message}")]
    Process {
        /// Program name
        program: String,
        /// Exit status or spawn error
        message: String,
    },

    /// Local file I/O while caching downloads
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into(), reason: reason.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable { endpoint: endpoint.into(), reason: reason.into() }
    }

    /// Create a process error.
    #[must_use]
    pub fn process(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Process { program: program.into(), message: message.into() }
    }

    /// Returns true if the language model runtime could not be reached.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Errors from the flat-file project store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Corrupt JSON file
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// A project with this name already exists.
    #[error("Project already exists: {0}")]
    ProjectExists(String),

    /// No project with this name.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Project names double as folder names.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from a collaborator client
    #[error("Service error: {0}")]
    Client(#[from] ClientError),

    /// Error from the project store
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Paper tools need an open project.
    #[error("No project is open")]
    NoOpenProject,

    /// Internal tool logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Convert to a user-friendly error message for the chat client.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(
                ClientError::InvalidUrl { .. }
                | ClientError::NotFound { .. }
                | ClientError::Http(_)
                | ClientError::Xml(_)
                | ClientError::Timeout(_),
            ) => {
                format!("Failed to fetch paper metadata. ({self})")
            }
            Self::Client(ClientError::Unavailable { endpoint, .. }) => {
                format!("The language model at {endpoint} is not reachable. Is Ollama running?")
            }
            Self::Store(StoreError::ProjectNotFound(name)) => {
                format!("Project '{name}' does not exist.")
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::NoOpenProject => {
                "No project is open. Use open_project or create_project first.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
