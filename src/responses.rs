//! Response text module.
//!
//! All client-visible strings live here: banners, prompts, menus, and the
//! formatters for profile/blog/user listings. Pure presentation, no
//! decisions.

use crate::store::{Blog, User};

// Connection lifecycle
pub const MSG_WELCOME: &str = "******Welcome to the scrawl server!******\n\
     Type 'reg <username> <password>' to register.\n\
     Type 'log <username> <password>' to log in.";
pub const MSG_GOODBYE: &str = "Goodbye!";

// Usage hints
pub const USAGE_REG: &str = "reg <username> <password>";
pub const USAGE_LOG: &str = "log <username> <password>";

// Registration / login
pub const MSG_REGISTERED: &str = "Registration successful!";

// Profile edit dialogue
pub const PROMPT_EDIT_CONFIRM: &str = "Would you like to edit your profile? (yes/no):";
pub const MSG_EDIT_CANCELED: &str = "Profile edit canceled.\nReturning to main menu.";
pub const MSG_PROFILE_UPDATED: &str = "Profile updated successfully!\nReturning to main menu.";

// Blog dialogue
pub const PROMPT_BLOG_ACTION: &str =
    "Would you like to post a new blog or delete one? (post/delete/exit):";
pub const PROMPT_BLOG_TITLE: &str = "Blog Title:";
pub const PROMPT_BLOG_TEXT: &str = "Blog Text:";
pub const PROMPT_BLOG_INDEX: &str = "Enter the blog number to delete:";
pub const MSG_BLOG_POSTED: &str = "Blog posted successfully!";
pub const MSG_BLOG_DELETED: &str = "Blog deleted successfully!";
pub const MSG_NO_BLOGS_TO_DELETE: &str = "You have no blogs to delete.\nReturning to main menu.";
pub const MSG_INVALID_BLOG_NUMBER: &str = "Invalid blog number.\nReturning to main menu.";
pub const MSG_INVALID_OPTION: &str = "Invalid option. Returning to main menu.";

// Admin dialogue
pub const PROMPT_APPROVAL_ACTION: &str =
    "Would you like to approve or reject any application? (approve/reject/exit):";
pub const PROMPT_APPROVE_USERNAME: &str = "Username to approve:";
pub const PROMPT_REJECT_USERNAME: &str = "Username to reject:";
pub const MSG_APPROVAL_EXIT: &str = "Exiting pending approvals.\nReturning to main menu.";
pub const MSG_APPLIED_ADMIN: &str = "Admin application submitted successfully.";

pub fn login_welcome(username: &str, is_admin: bool) -> String {
    if is_admin {
        format!("Login successful. Welcome Admin, {username}!")
    } else {
        format!("Login successful. Welcome, {username}!")
    }
}

pub fn menu(is_admin: bool) -> String {
    let mut out = String::from("Available commands:\n");
    if is_admin {
        out.push_str("- list-pending\n- list-users\n");
    }
    out.push_str("- view-profile\n- my-blogs\n- apply-admin\n- exit");
    out
}

pub fn profile_view(user: &User) -> String {
    let p = &user.profile;
    format!(
        "Name: {}\nSurname: {}\nFav Animal: {}\nFav Movie: {}\nYear of Birth: {}\nCity of Birth: {}\nFootball Team: {}",
        p.name,
        p.surname,
        p.favorite_animal,
        p.favorite_movie,
        p.year_of_birth,
        p.city_of_birth,
        p.football_team
    )
}

/// 1-indexed blog listing, in the same order the session captured the ids.
pub fn blog_list(blogs: &[Blog]) -> String {
    let mut out = String::from("Your Blogs:");
    for (i, blog) in blogs.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} ({})\n{}",
            i + 1,
            blog.title,
            blog.created_at.format("%Y-%m-%d"),
            blog.text
        ));
    }
    out
}

pub fn user_list(users: &[User]) -> String {
    let mut out = String::from("Users:");
    for user in users {
        out.push_str(&format!(
            "\n- {} (Role: {}, Status: {})",
            user.username, user.role, user.status
        ));
    }
    out
}

pub fn pending_list(users: &[User]) -> String {
    let mut out = String::from("Pending Admin Approvals:");
    for user in users {
        out.push_str(&format!("\n- {}", user.username));
    }
    out
}

pub fn approved(username: &str) -> String {
    format!("Admin request approved for user: {username}")
}

pub fn rejected(username: &str) -> String {
    format!("Admin request rejected for user: {username}")
}

pub fn field_prompt(field: crate::session::ProfileField) -> &'static str {
    use crate::session::ProfileField::*;
    match field {
        Name => "Name:",
        Surname => "Surname:",
        FavoriteAnimal => "Favorite Animal:",
        FavoriteMovie => "Favorite Movie:",
        YearOfBirth => "Year of Birth:",
        CityOfBirth => "City of Birth:",
        FootballTeam => "Football Team:",
    }
}
