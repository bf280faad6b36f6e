//! Registration and login command handlers.

use super::{CommandHandler, HandlerContext, Reply};
use crate::error::{AuthError, ProtocolError, ScrawlError};
use crate::responses;
use crate::store::User;

/// Handler for `reg <username> <password>`.
///
/// Always creates a plain user with pending status; admin standing is
/// only reachable through the apply/approve workflow.
pub struct RegHandler;

impl CommandHandler for RegHandler {
    async fn handle(ctx: &mut HandlerContext, args: &[String]) -> Reply {
        if args.len() != 2 {
            return Reply::from_error(ProtocolError::Usage(responses::USAGE_REG));
        }
        let username = &args[0];
        let hash = match ctx.verifier.hash(&args[1]).await {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!(error = %err, "password hashing failed during registration");
                return Reply::from_error(err);
            }
        };
        match ctx.store.create_user(User::new(username.clone(), hash)).await {
            Ok(()) => Reply::success(responses::MSG_REGISTERED),
            Err(err) => Reply::from_error(err),
        }
    }
}

/// Handler for `log <username> <password>`.
pub struct LoginHandler;

impl CommandHandler for LoginHandler {
    async fn handle(ctx: &mut HandlerContext, args: &[String]) -> Reply {
        if args.len() != 2 {
            return Reply::from_error(ProtocolError::Usage(responses::USAGE_LOG));
        }
        let username = &args[0];

        // Unknown user and wrong password both collapse into the same
        // generic failure; only the log knows which it was.
        let user = match ctx.store.find_user(username).await {
            Ok(user) => user,
            Err(err) => {
                tracing::info!(user = %username, error = %err, "login failed");
                return Reply::from_error(AuthError::InvalidCredentials(username.clone()));
            }
        };
        match ctx.verifier.verify(&args[1], &user.password_hash).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user = %username, "login failed: bad password");
                return Reply::from_error(AuthError::InvalidCredentials(username.clone()));
            }
            Err(err) => {
                tracing::error!(user = %username, error = %err, "credential verification error");
                return Reply::from_error(ScrawlError::Auth(AuthError::InvalidCredentials(
                    username.clone(),
                )));
            }
        }

        let is_admin = user.is_privileged_admin();
        ctx.session.authenticate(user.username.clone(), is_admin);
        Reply::success(format!(
            "{}\n{}",
            responses::login_welcome(&user.username, is_admin),
            responses::menu(is_admin)
        ))
    }
}
