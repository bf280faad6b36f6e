//! Domain error types for the scrawl server
//!
//! Errors are structured internally for logging/debugging but provide
//! generic responses to clients to avoid leaking sensitive information.
//! In particular, a failed login never reveals whether the username was
//! unknown or the password was wrong.

use thiserror::Error;

/// Top-level server error type
#[derive(Error, Debug)]
pub enum ScrawlError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Blog not found: {0}")]
    BlogNotFound(u64),

    #[error("User {user} is not the author of blog {id}")]
    NotBlogAuthor { user: String, id: u64 },

    #[error("User {0} has no pending admin application")]
    NotPending(String),

    #[error("User {0} already has a pending admin application")]
    AlreadyPending(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials for user: {0}")]
    InvalidCredentials(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Empty or malformed command line")]
    InvalidFormat,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Permission denied for command: {0}")]
    Forbidden(String),
}

impl ScrawlError {
    /// Get a client-safe response message (generic, no internal details)
    pub fn client_message(&self) -> String {
        match self {
            ScrawlError::Store(StoreError::UserNotFound(_)) => "User not found.".into(),
            ScrawlError::Store(StoreError::UserExists(_)) => "User already exists.".into(),
            ScrawlError::Store(StoreError::BlogNotFound(_)) => "Blog not found.".into(),
            ScrawlError::Store(StoreError::NotBlogAuthor { .. }) => {
                "You are not the author of this blog.".into()
            }
            ScrawlError::Store(StoreError::NotPending(_)) => {
                "User is not pending approval.".into()
            }
            ScrawlError::Store(StoreError::AlreadyPending(_)) => {
                "Admin application already pending.".into()
            }
            ScrawlError::Store(StoreError::Snapshot(_)) => {
                "Service temporarily unavailable.".into()
            }

            // Unknown username and wrong password are deliberately
            // indistinguishable to the client.
            ScrawlError::Auth(AuthError::InvalidCredentials(_)) => {
                "Invalid username or password. Please try again.".into()
            }
            ScrawlError::Auth(AuthError::Hashing(_)) => "Registration failed.".into(),

            ScrawlError::Protocol(ProtocolError::InvalidFormat) => {
                "Invalid command format.".into()
            }
            ScrawlError::Protocol(ProtocolError::UnknownCommand(_)) => "Unknown command.".into(),
            ScrawlError::Protocol(ProtocolError::Usage(usage)) => format!("Usage: {usage}"),
            ScrawlError::Protocol(ProtocolError::InvalidInput(msg)) => {
                format!("Invalid input: {msg}")
            }
            ScrawlError::Protocol(ProtocolError::Forbidden(_)) => {
                "You do not have permission to perform this action.".into()
            }

            ScrawlError::Io(_) => "Service temporarily unavailable.".into(),
        }
    }
}
