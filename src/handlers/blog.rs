//! Blog listing and the post/delete dialogue.

use super::{CommandHandler, HandlerContext, Reply};
use crate::error::ProtocolError;
use crate::responses;
use crate::session::SessionState;

/// Handler for `my-blogs`: lists the caller's blogs 1-indexed, then asks
/// whether to post a new one or delete an existing one.
pub struct MyBlogsHandler;

impl CommandHandler for MyBlogsHandler {
    async fn handle(ctx: &mut HandlerContext, _args: &[String]) -> Reply {
        let username = ctx.session.current_user().to_string();
        let blogs = ctx.store.blogs_by_author(&username).await;
        // Capture the ids in display order so a later 1-based delete index
        // maps to the right blog even if the store changes meanwhile.
        let listed = blogs.iter().map(|b| b.id).collect();
        ctx.session.set_state(SessionState::AwaitBlogAction { listed });
        Reply::prompt(format!(
            "{}\n{}",
            responses::blog_list(&blogs),
            responses::PROMPT_BLOG_ACTION
        ))
    }
}

/// Answer to the post/delete/exit question.
pub async fn continue_action(ctx: &mut HandlerContext, listed: &[u64], line: &str) -> Reply {
    match line {
        "post" => {
            ctx.session.set_state(SessionState::AwaitBlogTitle);
            Reply::prompt(responses::PROMPT_BLOG_TITLE)
        }
        "delete" => {
            if listed.is_empty() {
                ctx.session.set_state(SessionState::Menu);
                Reply::info(responses::MSG_NO_BLOGS_TO_DELETE)
            } else {
                ctx.session.set_state(SessionState::AwaitBlogIndex {
                    listed: listed.to_vec(),
                });
                Reply::prompt(responses::PROMPT_BLOG_INDEX)
            }
        }
        "exit" => {
            ctx.session.set_state(SessionState::Menu);
            Reply::info(responses::menu(ctx.session.is_admin()))
        }
        _ => {
            ctx.session.set_state(SessionState::Menu);
            Reply::failure(responses::MSG_INVALID_OPTION)
        }
    }
}

pub async fn continue_title(ctx: &mut HandlerContext, line: &str) -> Reply {
    if line.is_empty() {
        ctx.session.set_state(SessionState::Menu);
        return Reply::from_error(ProtocolError::InvalidInput(
            "blog title must not be empty".into(),
        ));
    }
    ctx.session.set_state(SessionState::AwaitBlogText {
        title: line.to_string(),
    });
    Reply::prompt(responses::PROMPT_BLOG_TEXT)
}

pub async fn continue_text(ctx: &mut HandlerContext, title: &str, line: &str) -> Reply {
    ctx.session.set_state(SessionState::Menu);
    if line.is_empty() {
        return Reply::from_error(ProtocolError::InvalidInput(
            "blog text must not be empty".into(),
        ));
    }
    let username = ctx.session.current_user().to_string();
    match ctx.store.create_blog(&username, title, line).await {
        Ok(_) => Reply::success(responses::MSG_BLOG_POSTED),
        Err(err) => Reply::from_error(err),
    }
}

/// A 1-based index into the listing captured when the dialogue opened.
/// Non-numeric or out-of-range input deletes nothing.
pub async fn continue_index(ctx: &mut HandlerContext, listed: &[u64], line: &str) -> Reply {
    ctx.session.set_state(SessionState::Menu);
    let index: usize = match line.parse() {
        Ok(n) => n,
        Err(_) => return Reply::failure(responses::MSG_INVALID_BLOG_NUMBER),
    };
    if index < 1 || index > listed.len() {
        return Reply::failure(responses::MSG_INVALID_BLOG_NUMBER);
    }
    let id = listed[index - 1];
    let username = ctx.session.current_user().to_string();
    match ctx.store.delete_blog(&username, id).await {
        Ok(()) => Reply::success(responses::MSG_BLOG_DELETED),
        Err(err) => Reply::from_error(err),
    }
}
