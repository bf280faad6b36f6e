//! Command handlers module.
//!
//! This module contains handlers for all protocol commands and the
//! continuations of the conversational sub-dialogues, organized by
//! category. Handlers never touch the transport: they take the shared
//! context, return a structured [`Reply`], and record the next session
//! state, so every step of a dialogue can be driven in tests without a
//! socket.

pub mod admin;
pub mod auth;
pub mod blog;
pub mod profile;

use crate::auth::DynVerifier;
use crate::error::{ProtocolError, ScrawlError};
use crate::parse::parse_command;
use crate::responses;
use crate::session::{Session, SessionState};
use crate::store::Store;

/// What the connection loop should do after writing the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Plain informational output; keep reading commands.
    Info,
    /// A sub-dialogue is awaiting its next line.
    Prompt,
    /// A mutation succeeded.
    Success,
    /// The operation failed; the session continues in its parent state.
    Failure,
    /// Farewell written; close the connection.
    Goodbye,
}

/// Structured operation result: a kind plus the rendered message, so
/// callers never have to pattern-match human-readable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Info,
            text: text.into(),
        }
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Prompt,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Failure,
            text: text.into(),
        }
    }

    pub fn goodbye() -> Self {
        Self {
            kind: ReplyKind::Goodbye,
            text: responses::MSG_GOODBYE.into(),
        }
    }

    /// Render a domain error as a client-safe failure reply.
    pub fn from_error(err: impl Into<ScrawlError>) -> Self {
        Self::failure(err.into().client_message())
    }
}

/// Context passed to command handlers.
pub struct HandlerContext {
    pub store: Store,
    pub verifier: DynVerifier,
    pub session: Session,
}

impl HandlerContext {
    pub fn new(store: Store, verifier: DynVerifier) -> Self {
        Self {
            store,
            verifier,
            session: Session::new(),
        }
    }
}

/// Trait for command handlers.
#[allow(async_fn_in_trait)]
pub trait CommandHandler {
    async fn handle(ctx: &mut HandlerContext, args: &[String]) -> Reply;
}

/// Feed one received line to the session state machine and produce the
/// reply. This is the single transition function: which handler runs is
/// decided by (current state, verb), and sub-dialogue states consume the
/// raw line instead of parsing a verb.
pub async fn dispatch_line(ctx: &mut HandlerContext, line: &str) -> Reply {
    let line = line.trim();
    let state = ctx.session.state().clone();
    match state {
        SessionState::Unauthenticated => {
            let Ok((_, cmd)) = parse_command(line) else {
                return Reply::from_error(ProtocolError::InvalidFormat);
            };
            match cmd.verb.as_str() {
                "reg" => auth::RegHandler::handle(ctx, &cmd.args).await,
                "log" => auth::LoginHandler::handle(ctx, &cmd.args).await,
                "exit" => {
                    ctx.session.terminate();
                    Reply::goodbye()
                }
                _ => Reply::from_error(ProtocolError::UnknownCommand(cmd.verb.clone())),
            }
        }
        SessionState::Menu => {
            let Ok((_, cmd)) = parse_command(line) else {
                return Reply::from_error(ProtocolError::InvalidFormat);
            };
            match cmd.verb.as_str() {
                "view-profile" => profile::ViewProfileHandler::handle(ctx, &cmd.args).await,
                "my-blogs" => blog::MyBlogsHandler::handle(ctx, &cmd.args).await,
                "apply-admin" => admin::ApplyAdminHandler::handle(ctx, &cmd.args).await,
                "list-pending" => admin::ListPendingHandler::handle(ctx, &cmd.args).await,
                "list-users" => admin::ListUsersHandler::handle(ctx, &cmd.args).await,
                "exit" => {
                    ctx.session.terminate();
                    Reply::goodbye()
                }
                _ => Reply::from_error(ProtocolError::UnknownCommand(cmd.verb.clone())),
            }
        }

        // Profile edit dialogue
        SessionState::AwaitEditConfirm => profile::continue_edit_confirm(ctx, line).await,
        SessionState::AwaitProfileField { field, draft } => {
            profile::continue_field(ctx, field, draft, line).await
        }

        // Blog dialogue
        SessionState::AwaitBlogAction { listed } => blog::continue_action(ctx, &listed, line).await,
        SessionState::AwaitBlogTitle => blog::continue_title(ctx, line).await,
        SessionState::AwaitBlogText { title } => blog::continue_text(ctx, &title, line).await,
        SessionState::AwaitBlogIndex { listed } => blog::continue_index(ctx, &listed, line).await,

        // Pending-approvals dialogue
        SessionState::AwaitApprovalAction => admin::continue_approval_action(ctx, line).await,
        SessionState::AwaitApprovalTarget { decision } => {
            admin::continue_approval_target(ctx, decision, line).await
        }

        SessionState::Terminated => Reply::goodbye(),
    }
}
