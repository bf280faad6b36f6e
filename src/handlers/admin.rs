//! Admin application workflow and admin-only listings.

use super::{CommandHandler, HandlerContext, Reply};
use crate::error::ProtocolError;
use crate::responses;
use crate::session::{ApprovalDecision, SessionState};

/// Forbidden reply for an admin-only verb issued by a non-admin. Not a
/// protocol error: the session stays where it was.
fn forbidden(verb: &str) -> Reply {
    Reply::from_error(ProtocolError::Forbidden(verb.to_string()))
}

/// Handler for `apply-admin`. The session's own privileges are unchanged
/// until a fresh login after approval.
pub struct ApplyAdminHandler;

impl CommandHandler for ApplyAdminHandler {
    async fn handle(ctx: &mut HandlerContext, _args: &[String]) -> Reply {
        let username = ctx.session.current_user().to_string();
        match ctx.store.apply_admin(&username).await {
            Ok(()) => Reply::success(responses::MSG_APPLIED_ADMIN),
            Err(err) => Reply::from_error(err),
        }
    }
}

/// Handler for `list-users` (admin only).
pub struct ListUsersHandler;

impl CommandHandler for ListUsersHandler {
    async fn handle(ctx: &mut HandlerContext, _args: &[String]) -> Reply {
        if !ctx.session.is_admin() {
            return forbidden("list-users");
        }
        let users = ctx.store.list_users().await;
        Reply::info(responses::user_list(&users))
    }
}

/// Handler for `list-pending` (admin only): lists pending applicants,
/// then opens the approve/reject dialogue.
pub struct ListPendingHandler;

impl CommandHandler for ListPendingHandler {
    async fn handle(ctx: &mut HandlerContext, _args: &[String]) -> Reply {
        if !ctx.session.is_admin() {
            return forbidden("list-pending");
        }
        let pending = ctx.store.list_pending_admins().await;
        ctx.session.set_state(SessionState::AwaitApprovalAction);
        Reply::prompt(format!(
            "{}\n{}",
            responses::pending_list(&pending),
            responses::PROMPT_APPROVAL_ACTION
        ))
    }
}

/// Answer to the approve/reject/exit question.
pub async fn continue_approval_action(ctx: &mut HandlerContext, line: &str) -> Reply {
    match line {
        "approve" => {
            ctx.session.set_state(SessionState::AwaitApprovalTarget {
                decision: ApprovalDecision::Approve,
            });
            Reply::prompt(responses::PROMPT_APPROVE_USERNAME)
        }
        "reject" => {
            ctx.session.set_state(SessionState::AwaitApprovalTarget {
                decision: ApprovalDecision::Reject,
            });
            Reply::prompt(responses::PROMPT_REJECT_USERNAME)
        }
        "exit" => {
            ctx.session.set_state(SessionState::Menu);
            Reply::info(responses::MSG_APPROVAL_EXIT)
        }
        _ => {
            ctx.session.set_state(SessionState::Menu);
            Reply::failure(responses::MSG_INVALID_OPTION)
        }
    }
}

/// The target username for a pending approve/reject decision.
pub async fn continue_approval_target(
    ctx: &mut HandlerContext,
    decision: ApprovalDecision,
    line: &str,
) -> Reply {
    ctx.session.set_state(SessionState::Menu);
    if line.is_empty() {
        return Reply::from_error(ProtocolError::InvalidInput(
            "username must not be empty".into(),
        ));
    }
    let result = match decision {
        ApprovalDecision::Approve => ctx.store.approve_admin(line).await,
        ApprovalDecision::Reject => ctx.store.reject_admin(line).await,
    };
    match result {
        Ok(()) => Reply::success(match decision {
            ApprovalDecision::Approve => responses::approved(line),
            ApprovalDecision::Reject => responses::rejected(line),
        }),
        Err(err) => Reply::from_error(err),
    }
}
