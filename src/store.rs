//! The shared record store: all user and blog state lives here.
//!
//! Every mutation takes the single store lock, applies the change, and
//! rewrites the full JSON snapshot before releasing it, so check-then-write
//! sequences (duplicate usernames, blog ownership) are atomic with respect
//! to concurrent sessions. The snapshot is written to a temporary file and
//! renamed over the target so a crash mid-write never corrupts the previous
//! snapshot.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Approved,
    Pending,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Approved => write!(f, "approved"),
            Status::Pending => write!(f, "pending"),
        }
    }
}

/// Free-form profile fields, all optional and overwritten wholesale on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub favorite_animal: String,
    #[serde(default)]
    pub favorite_movie: String,
    #[serde(default)]
    pub year_of_birth: String,
    #[serde(default)]
    pub city_of_birth: String,
    #[serde(default)]
    pub football_team: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Opaque credential produced by the verifier. Never logged, never
    /// echoed to clients.
    pub password_hash: String,
    pub role: Role,
    pub status: Status,
    #[serde(default)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered account: plain user, pending status, empty profile.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            role: Role::User,
            status: Status::Pending,
            profile: Profile::default(),
            created_at: Utc::now(),
        }
    }

    /// An administrator with privileges, as opposed to one with an
    /// outstanding application.
    pub fn is_privileged_admin(&self) -> bool {
        self.role == Role::Admin && self.status == Status::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// On-disk snapshot format: two named collections plus the id counter.
#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
    users: Vec<User>,
    blogs: Vec<Blog>,
    #[serde(default = "first_blog_id")]
    next_blog_id: u64,
}

fn first_blog_id() -> u64 {
    1
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<String, User>,
    blogs: HashMap<u64, Blog>,
    next_blog_id: u64,
}

impl StoreInner {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.values().cloned().collect(),
            blogs: self.blogs.values().cloned().collect(),
            next_blog_id: self.next_blog_id,
        }
    }
}

struct StoreShared {
    inner: Mutex<StoreInner>,
    path: PathBuf,
}

/// Handle to the shared store. Cheap to clone; all clones serialize their
/// mutations through the same lock.
#[derive(Clone)]
pub struct Store {
    shared: Arc<StoreShared>,
}

impl Store {
    /// Open the store, loading an existing snapshot if one is present.
    ///
    /// A missing snapshot file means a fresh start. A malformed one is
    /// reported and left untouched on disk; the store starts empty and the
    /// old bytes survive until the next successful save.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let inner = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Snapshot>(&bytes) {
                Ok(snap) => {
                    let max_id = snap.blogs.iter().map(|b| b.id).max().unwrap_or(0);
                    StoreInner {
                        users: snap
                            .users
                            .into_iter()
                            .map(|u| (u.username.clone(), u))
                            .collect(),
                        blogs: snap.blogs.into_iter().map(|b| (b.id, b)).collect(),
                        next_blog_id: snap.next_blog_id.max(max_id + 1),
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed snapshot, starting empty");
                    StoreInner {
                        next_blog_id: 1,
                        ..StoreInner::default()
                    }
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreInner {
                next_blog_id: 1,
                ..StoreInner::default()
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read snapshot, starting empty");
                StoreInner {
                    next_blog_id: 1,
                    ..StoreInner::default()
                }
            }
        };
        Self {
            shared: Arc::new(StoreShared {
                inner: Mutex::new(inner),
                path,
            }),
        }
    }

    /// Write the full snapshot via a temporary file and an atomic rename.
    /// Called with the store lock held so snapshots are mutation-consistent.
    async fn persist(&self, inner: &StoreInner) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec_pretty(&inner.snapshot()).map_err(|e| {
                StoreError::Snapshot(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
        let tmp = self.shared.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(StoreError::Snapshot)?;
        tokio::fs::rename(&tmp, &self.shared.path)
            .await
            .map_err(StoreError::Snapshot)?;
        Ok(())
    }

    /// Persist, demoting write failures to a log line: in-memory state stays
    /// the source of truth for the rest of the process lifetime.
    async fn persist_or_log(&self, inner: &StoreInner) {
        if let Err(e) = self.persist(inner).await {
            error!(path = %self.shared.path.display(), error = %e, "snapshot write failed");
        }
    }

    // --- User operations ---

    pub async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        if inner.users.contains_key(&user.username) {
            return Err(StoreError::UserExists(user.username));
        }
        inner.users.insert(user.username.clone(), user);
        self.persist_or_log(&inner).await;
        Ok(())
    }

    pub async fn find_user(&self, username: &str) -> Result<User, StoreError> {
        let inner = self.shared.inner.lock().await;
        inner
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    /// Overwrite the record keyed by `user.username` (upsert semantics;
    /// callers pre-fetch in practice).
    pub async fn update_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        inner.users.insert(user.username.clone(), user);
        self.persist_or_log(&inner).await;
        Ok(())
    }

    /// Remove a user record. The user's blogs are left in place; see
    /// DESIGN.md for the orphan policy.
    pub async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        if inner.users.remove(username).is_none() {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        self.persist_or_log(&inner).await;
        Ok(())
    }

    pub async fn list_users(&self) -> Vec<User> {
        let inner = self.shared.inner.lock().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    pub async fn list_pending_admins(&self) -> Vec<User> {
        let inner = self.shared.inner.lock().await;
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.status == Status::Pending && u.role == Role::Admin)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    /// File an admin application: role becomes admin, status pending.
    pub async fn apply_admin(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        let user = inner
            .users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        if user.status == Status::Pending && user.role == Role::Admin {
            return Err(StoreError::AlreadyPending(username.to_string()));
        }
        user.role = Role::Admin;
        user.status = Status::Pending;
        self.persist_or_log(&inner).await;
        Ok(())
    }

    pub async fn approve_admin(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        let user = inner
            .users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        if user.status != Status::Pending {
            return Err(StoreError::NotPending(username.to_string()));
        }
        user.status = Status::Approved;
        self.persist_or_log(&inner).await;
        Ok(())
    }

    /// Reject an admin application by reverting the account to a plain
    /// approved user. The account, its profile, and its blogs all survive.
    pub async fn reject_admin(&self, username: &str) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        let user = inner
            .users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        if user.status != Status::Pending || user.role != Role::Admin {
            return Err(StoreError::NotPending(username.to_string()));
        }
        user.role = Role::User;
        user.status = Status::Approved;
        self.persist_or_log(&inner).await;
        Ok(())
    }

    // --- Blog operations ---

    /// Insert a new blog under a fresh id. The author is not re-validated
    /// here; the session engine only reaches this for its logged-in user.
    pub async fn create_blog(
        &self,
        author: &str,
        title: &str,
        text: &str,
    ) -> Result<Blog, StoreError> {
        let mut inner = self.shared.inner.lock().await;
        let id = inner.next_blog_id;
        inner.next_blog_id += 1;
        let blog = Blog {
            id,
            author: author.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        inner.blogs.insert(id, blog.clone());
        self.persist_or_log(&inner).await;
        Ok(blog)
    }

    pub async fn delete_blog(&self, author: &str, id: u64) -> Result<(), StoreError> {
        let mut inner = self.shared.inner.lock().await;
        let blog = inner.blogs.get(&id).ok_or(StoreError::BlogNotFound(id))?;
        if blog.author != author {
            return Err(StoreError::NotBlogAuthor {
                user: author.to_string(),
                id,
            });
        }
        inner.blogs.remove(&id);
        self.persist_or_log(&inner).await;
        Ok(())
    }

    pub async fn blogs_by_author(&self, username: &str) -> Vec<Blog> {
        let inner = self.shared.inner.lock().await;
        let mut blogs: Vec<Blog> = inner
            .blogs
            .values()
            .filter(|b| b.author == username)
            .cloned()
            .collect();
        blogs.sort_by_key(|b| b.id);
        blogs
    }
}
