//! Session state machine tests: every dialogue step driven without a
//! socket by feeding lines straight to the dispatcher.

mod common;

use async_trait::async_trait;
use common::{plain_verifier, temp_store};
use scrawl::auth::CredentialVerifier;
use scrawl::error::AuthError;
use scrawl::handlers::{HandlerContext, ReplyKind, dispatch_line};
use scrawl::session::SessionState;
use scrawl::store::{Role, Status, Store, User};
use std::sync::Arc;
use tempfile::TempDir;

fn ctx_with(store: Store) -> HandlerContext {
    HandlerContext::new(store, plain_verifier())
}

fn fresh_ctx() -> (HandlerContext, TempDir) {
    let (store, dir) = temp_store();
    (ctx_with(store), dir)
}

async fn register_and_login(ctx: &mut HandlerContext, name: &str) {
    let reply = dispatch_line(ctx, &format!("reg {name} pw")).await;
    assert_eq!(reply.kind, ReplyKind::Success);
    let reply = dispatch_line(ctx, &format!("log {name} pw")).await;
    assert_eq!(reply.kind, ReplyKind::Success);
}

/// Build an approved admin account directly in the store; logging in is
/// still the session's job.
async fn seed_admin(store: &Store, name: &str) {
    let mut admin = User::new(name.to_string(), "plain:pw".to_string());
    admin.role = Role::Admin;
    admin.status = Status::Approved;
    store.create_user(admin).await.unwrap();
}

#[tokio::test]
async fn empty_line_is_invalid_format() {
    let (mut ctx, _dir) = fresh_ctx();
    let reply = dispatch_line(&mut ctx, "   ").await;
    assert_eq!(reply.kind, ReplyKind::Failure);
    assert_eq!(reply.text, "Invalid command format.");
}

#[tokio::test]
async fn unknown_verb_before_login() {
    let (mut ctx, _dir) = fresh_ctx();
    let reply = dispatch_line(&mut ctx, "frobnicate").await;
    assert_eq!(reply.text, "Unknown command.");
    // Authenticated-only verbs are unknown here too.
    let reply = dispatch_line(&mut ctx, "view-profile").await;
    assert_eq!(reply.text, "Unknown command.");
}

#[tokio::test]
async fn reg_wrong_arity_gets_usage_hint() {
    let (mut ctx, _dir) = fresh_ctx();
    let reply = dispatch_line(&mut ctx, "reg alice").await;
    assert_eq!(reply.kind, ReplyKind::Failure);
    assert!(reply.text.contains("reg <username> <password>"));
}

/// Verifier whose key derivation always fails, as if the backend were
/// misconfigured.
struct BrokenVerifier;

#[async_trait]
impl CredentialVerifier for BrokenVerifier {
    async fn hash(&self, _password: &str) -> Result<String, AuthError> {
        Err(AuthError::Hashing("entropy source unavailable".into()))
    }

    async fn verify(&self, _password: &str, _stored: &str) -> Result<bool, AuthError> {
        Ok(false)
    }
}

#[tokio::test]
async fn hashing_failure_is_a_generic_registration_failure() {
    let (store, _dir) = temp_store();
    let mut ctx = HandlerContext::new(store.clone(), Arc::new(BrokenVerifier));
    let reply = dispatch_line(&mut ctx, "reg alice pw").await;
    assert_eq!(reply.kind, ReplyKind::Failure);
    // Generic text: the internal cause stays in the log.
    assert_eq!(reply.text, "Registration failed.");
    assert!(store.find_user("alice").await.is_err());
}

#[tokio::test]
async fn duplicate_registration_fails_second_time() {
    let (mut ctx, _dir) = fresh_ctx();
    let first = dispatch_line(&mut ctx, "reg alice pw").await;
    assert_eq!(first.kind, ReplyKind::Success);
    let second = dispatch_line(&mut ctx, "reg alice other").await;
    assert_eq!(second.kind, ReplyKind::Failure);
    assert_eq!(second.text, "User already exists.");
}

#[tokio::test]
async fn login_failures_are_textually_indistinguishable() {
    let (mut ctx, _dir) = fresh_ctx();
    dispatch_line(&mut ctx, "reg alice rightpw").await;

    let wrong_pw = dispatch_line(&mut ctx, "log alice wrongpw").await;
    let unknown_user = dispatch_line(&mut ctx, "log nobody whatever").await;
    assert_eq!(wrong_pw.kind, ReplyKind::Failure);
    assert_eq!(wrong_pw, unknown_user);
    assert_eq!(*ctx.session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn successful_login_reaches_the_menu() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    assert_eq!(*ctx.session.state(), SessionState::Menu);
    assert!(!ctx.session.is_admin());
}

#[tokio::test]
async fn non_admin_menu_hides_admin_commands() {
    let (mut ctx, _dir) = fresh_ctx();
    dispatch_line(&mut ctx, "reg bob pw").await;
    let reply = dispatch_line(&mut ctx, "log bob pw").await;
    assert!(reply.text.contains("Welcome, bob!"));
    assert!(!reply.text.contains("list-pending"));
    assert!(!reply.text.contains("list-users"));
}

#[tokio::test]
async fn admin_login_shows_admin_menu() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut ctx = ctx_with(store);
    let reply = dispatch_line(&mut ctx, "log root pw").await;
    assert!(reply.text.contains("Welcome Admin, root!"));
    assert!(reply.text.contains("list-pending"));
    assert!(ctx.session.is_admin());
}

#[tokio::test]
async fn exit_terminates_at_any_level() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    let reply = dispatch_line(&mut ctx, "exit").await;
    assert_eq!(reply.kind, ReplyKind::Goodbye);
    assert_eq!(*ctx.session.state(), SessionState::Terminated);
}

#[tokio::test]
async fn profile_edit_walks_seven_fields_then_updates_once() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;

    let reply = dispatch_line(&mut ctx, "view-profile").await;
    assert_eq!(reply.kind, ReplyKind::Prompt);
    assert!(reply.text.contains("edit your profile"));

    let answers = [
        ("Ada", "Surname:"),
        ("Lovelace", "Favorite Animal:"),
        ("owl", "Favorite Movie:"),
        ("Metropolis", "Year of Birth:"),
        ("1815", "City of Birth:"),
        ("London", "Football Team:"),
    ];
    dispatch_line(&mut ctx, "yes").await;
    for (answer, next_prompt) in answers {
        let reply = dispatch_line(&mut ctx, answer).await;
        assert_eq!(reply.kind, ReplyKind::Prompt);
        assert!(reply.text.contains(next_prompt), "expected {next_prompt}");
    }
    let done = dispatch_line(&mut ctx, "none").await;
    assert_eq!(done.kind, ReplyKind::Success);
    assert_eq!(*ctx.session.state(), SessionState::Menu);

    let alice = ctx.store.find_user("alice").await.unwrap();
    assert_eq!(alice.profile.name, "Ada");
    assert_eq!(alice.profile.year_of_birth, "1815");
    assert_eq!(alice.profile.football_team, "none");
}

#[tokio::test]
async fn profile_edit_cancel_mutates_nothing() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    dispatch_line(&mut ctx, "view-profile").await;
    let reply = dispatch_line(&mut ctx, "no").await;
    assert!(reply.text.contains("canceled"));
    assert_eq!(*ctx.session.state(), SessionState::Menu);
    let alice = ctx.store.find_user("alice").await.unwrap();
    assert_eq!(alice.profile.name, "");
}

#[tokio::test]
async fn blog_post_flow_creates_a_blog() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;

    let reply = dispatch_line(&mut ctx, "my-blogs").await;
    assert_eq!(reply.kind, ReplyKind::Prompt);
    dispatch_line(&mut ctx, "post").await;
    dispatch_line(&mut ctx, "My first post").await;
    let reply = dispatch_line(&mut ctx, "Hello from the socket.").await;
    assert_eq!(reply.kind, ReplyKind::Success);

    let blogs = ctx.store.blogs_by_author("alice").await;
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].title, "My first post");
}

#[tokio::test]
async fn blog_delete_maps_display_index_to_id() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    ctx.store.create_blog("alice", "first", "a").await.unwrap();
    let second = ctx.store.create_blog("alice", "second", "b").await.unwrap();

    dispatch_line(&mut ctx, "my-blogs").await;
    dispatch_line(&mut ctx, "delete").await;
    let reply = dispatch_line(&mut ctx, "2").await;
    assert_eq!(reply.kind, ReplyKind::Success);

    let left = ctx.store.blogs_by_author("alice").await;
    assert_eq!(left.len(), 1);
    assert!(left.iter().all(|b| b.id != second.id));
}

#[tokio::test]
async fn blog_delete_rejects_bad_indexes() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    ctx.store.create_blog("alice", "only", "x").await.unwrap();

    for bad in ["0", "2", "abc", "-1"] {
        dispatch_line(&mut ctx, "my-blogs").await;
        dispatch_line(&mut ctx, "delete").await;
        let reply = dispatch_line(&mut ctx, bad).await;
        assert_eq!(reply.kind, ReplyKind::Failure, "index {bad:?}");
        assert_eq!(*ctx.session.state(), SessionState::Menu);
    }
    assert_eq!(ctx.store.blogs_by_author("alice").await.len(), 1);
}

#[tokio::test]
async fn blog_delete_with_no_blogs_is_a_noop_message() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    dispatch_line(&mut ctx, "my-blogs").await;
    let reply = dispatch_line(&mut ctx, "delete").await;
    assert!(reply.text.contains("no blogs to delete"));
    assert_eq!(*ctx.session.state(), SessionState::Menu);
}

#[tokio::test]
async fn blog_dialogue_invalid_option_returns_to_menu() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    dispatch_line(&mut ctx, "my-blogs").await;
    let reply = dispatch_line(&mut ctx, "shuffle").await;
    assert_eq!(reply.kind, ReplyKind::Failure);
    assert_eq!(*ctx.session.state(), SessionState::Menu);
}

#[tokio::test]
async fn my_blogs_lists_only_the_sessions_author() {
    let (mut ctx, _dir) = fresh_ctx();
    ctx.store.create_blog("other", "not-mine", "x").await.unwrap();
    register_and_login(&mut ctx, "alice").await;
    ctx.store.create_blog("alice", "mine", "y").await.unwrap();

    let reply = dispatch_line(&mut ctx, "my-blogs").await;
    assert!(reply.text.contains("mine"));
    assert!(!reply.text.contains("not-mine"));
}

#[tokio::test]
async fn admin_only_verbs_are_forbidden_for_users() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    for verb in ["list-pending", "list-users"] {
        let reply = dispatch_line(&mut ctx, verb).await;
        assert_eq!(reply.kind, ReplyKind::Failure, "{verb}");
        assert!(reply.text.contains("permission"));
        // Not a protocol error: the session stays authenticated.
        assert_eq!(*ctx.session.state(), SessionState::Menu);
    }
}

#[tokio::test]
async fn apply_twice_fails_without_state_change() {
    let (mut ctx, _dir) = fresh_ctx();
    register_and_login(&mut ctx, "alice").await;
    let first = dispatch_line(&mut ctx, "apply-admin").await;
    assert_eq!(first.kind, ReplyKind::Success);
    let second = dispatch_line(&mut ctx, "apply-admin").await;
    assert_eq!(second.kind, ReplyKind::Failure);
    assert!(second.text.contains("already pending"));
}

#[tokio::test]
async fn apply_approve_then_fresh_login_grants_admin() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut user_ctx = ctx_with(store.clone());
    register_and_login(&mut user_ctx, "alice").await;
    dispatch_line(&mut user_ctx, "apply-admin").await;
    // Privileges don't change mid-session.
    assert!(!user_ctx.session.is_admin());

    let mut admin_ctx = ctx_with(store.clone());
    dispatch_line(&mut admin_ctx, "log root pw").await;
    let listing = dispatch_line(&mut admin_ctx, "list-pending").await;
    assert!(listing.text.contains("alice"));
    dispatch_line(&mut admin_ctx, "approve").await;
    let reply = dispatch_line(&mut admin_ctx, "alice").await;
    assert_eq!(reply.kind, ReplyKind::Success);
    assert!(reply.text.contains("approved for user: alice"));

    let mut again = ctx_with(store);
    let reply = dispatch_line(&mut again, "log alice pw").await;
    assert!(reply.text.contains("Welcome Admin, alice!"));
    assert!(again.session.is_admin());
}

#[tokio::test]
async fn reject_keeps_the_account() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut user_ctx = ctx_with(store.clone());
    register_and_login(&mut user_ctx, "alice").await;
    dispatch_line(&mut user_ctx, "apply-admin").await;

    let mut admin_ctx = ctx_with(store.clone());
    dispatch_line(&mut admin_ctx, "log root pw").await;
    dispatch_line(&mut admin_ctx, "list-pending").await;
    dispatch_line(&mut admin_ctx, "reject").await;
    let reply = dispatch_line(&mut admin_ctx, "alice").await;
    assert_eq!(reply.kind, ReplyKind::Success);

    let alice = store.find_user("alice").await.unwrap();
    assert!(!alice.is_privileged_admin());
    // The rejected account can still log in.
    let mut again = ctx_with(store);
    let reply = dispatch_line(&mut again, "log alice pw").await;
    assert_eq!(reply.kind, ReplyKind::Success);
}

#[tokio::test]
async fn approve_unknown_user_reports_not_found() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut ctx = ctx_with(store);
    dispatch_line(&mut ctx, "log root pw").await;
    dispatch_line(&mut ctx, "list-pending").await;
    dispatch_line(&mut ctx, "approve").await;
    let reply = dispatch_line(&mut ctx, "ghost").await;
    assert_eq!(reply.kind, ReplyKind::Failure);
    assert_eq!(reply.text, "User not found.");
    assert_eq!(*ctx.session.state(), SessionState::Menu);
}

#[tokio::test]
async fn approval_dialogue_exit_returns_to_menu() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut ctx = ctx_with(store);
    dispatch_line(&mut ctx, "log root pw").await;
    dispatch_line(&mut ctx, "list-pending").await;
    let reply = dispatch_line(&mut ctx, "exit").await;
    // exit inside a dialogue leaves the dialogue, not the session.
    assert_ne!(reply.kind, ReplyKind::Goodbye);
    assert_eq!(*ctx.session.state(), SessionState::Menu);
}

#[tokio::test]
async fn list_users_shows_roles_and_statuses() {
    let (store, _dir) = temp_store();
    seed_admin(&store, "root").await;
    let mut ctx = ctx_with(store);
    dispatch_line(&mut ctx, "log root pw").await;
    dispatch_line(&mut ctx, "reg-was-here").await; // unknown, ignored
    let reply = dispatch_line(&mut ctx, "list-users").await;
    assert!(reply.text.contains("root (Role: admin, Status: approved)"));
}
