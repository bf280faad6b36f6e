//! Profile viewing and the seven-field edit dialogue.

use super::{CommandHandler, HandlerContext, Reply};
use crate::responses;
use crate::session::{ProfileField, SessionState};
use crate::store::Profile;

/// Handler for `view-profile`: shows the profile, then opens the edit
/// confirmation dialogue.
pub struct ViewProfileHandler;

impl CommandHandler for ViewProfileHandler {
    async fn handle(ctx: &mut HandlerContext, _args: &[String]) -> Reply {
        let username = ctx.session.current_user().to_string();
        let user = match ctx.store.find_user(&username).await {
            Ok(user) => user,
            Err(err) => return Reply::from_error(err),
        };
        ctx.session.set_state(SessionState::AwaitEditConfirm);
        Reply::prompt(format!(
            "{}\n{}",
            responses::profile_view(&user),
            responses::PROMPT_EDIT_CONFIRM
        ))
    }
}

/// Answer to the yes/no edit confirmation. Anything but a literal "yes"
/// cancels with no mutation.
pub async fn continue_edit_confirm(ctx: &mut HandlerContext, line: &str) -> Reply {
    if line == "yes" {
        ctx.session.set_state(SessionState::AwaitProfileField {
            field: ProfileField::FIRST,
            draft: Profile::default(),
        });
        Reply::prompt(responses::field_prompt(ProfileField::FIRST))
    } else {
        ctx.session.set_state(SessionState::Menu);
        Reply::info(responses::MSG_EDIT_CANCELED)
    }
}

/// One answer in the fixed seven-field walk. After the last field the
/// whole record is updated in a single store call.
pub async fn continue_field(
    ctx: &mut HandlerContext,
    field: ProfileField,
    mut draft: Profile,
    line: &str,
) -> Reply {
    field.set(&mut draft, line);
    if let Some(next) = field.next() {
        ctx.session.set_state(SessionState::AwaitProfileField { field: next, draft });
        return Reply::prompt(responses::field_prompt(next));
    }

    ctx.session.set_state(SessionState::Menu);
    let username = ctx.session.current_user().to_string();
    let mut user = match ctx.store.find_user(&username).await {
        Ok(user) => user,
        Err(err) => return Reply::from_error(err),
    };
    user.profile = draft;
    match ctx.store.update_user(user).await {
        Ok(()) => Reply::success(responses::MSG_PROFILE_UPDATED),
        Err(err) => Reply::from_error(err),
    }
}
