//! scrawl: a line-oriented TCP server for user profiles and micro-blogs.
//!
//! Clients speak a newline-delimited text protocol: register or log in,
//! then manage a profile, author and delete short blog posts, and (for
//! approved admins) work through pending admin applications. All state
//! lives in a single shared [`store::Store`] that snapshots itself to a
//! JSON file after every mutation.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parse;
pub mod registry;
pub mod responses;
pub mod server;
pub mod session;
pub mod store;

pub use parse::{Command, parse_command};
pub use server::handle_client;
