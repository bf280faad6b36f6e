//! Connection session state management
//!
//! One [`Session`] exists per connection. The state enum makes every
//! conversational step explicit: sub-dialogues (profile edit, blog
//! management, pending approvals) are states awaiting their next line,
//! not nested blocking reads, so each step can be driven in tests by
//! feeding lines straight to the dispatcher.

use crate::store::Profile;

/// Which profile field the edit dialogue is currently asking for.
/// The seven fields are always walked in this fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Surname,
    FavoriteAnimal,
    FavoriteMovie,
    YearOfBirth,
    CityOfBirth,
    FootballTeam,
}

impl ProfileField {
    pub const FIRST: ProfileField = ProfileField::Name;

    /// The field that follows this one, or `None` after the last.
    pub fn next(self) -> Option<ProfileField> {
        use ProfileField::*;
        match self {
            Name => Some(Surname),
            Surname => Some(FavoriteAnimal),
            FavoriteAnimal => Some(FavoriteMovie),
            FavoriteMovie => Some(YearOfBirth),
            YearOfBirth => Some(CityOfBirth),
            CityOfBirth => Some(FootballTeam),
            FootballTeam => None,
        }
    }

    /// Store the answer for this field into the draft profile.
    pub fn set(self, draft: &mut Profile, value: &str) {
        let slot = match self {
            ProfileField::Name => &mut draft.name,
            ProfileField::Surname => &mut draft.surname,
            ProfileField::FavoriteAnimal => &mut draft.favorite_animal,
            ProfileField::FavoriteMovie => &mut draft.favorite_movie,
            ProfileField::YearOfBirth => &mut draft.year_of_birth,
            ProfileField::CityOfBirth => &mut draft.city_of_birth,
            ProfileField::FootballTeam => &mut draft.football_team,
        };
        *slot = value.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Per-connection protocol state.
///
/// Sub-dialogue states always return to `Menu` when their flow completes
/// or is cancelled; only `exit` and transport failure reach `Terminated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Menu,
    /// Profile shown, awaiting yes/no for the edit walk.
    AwaitEditConfirm,
    /// Walking the seven profile fields; `draft` accumulates answers.
    AwaitProfileField { field: ProfileField, draft: Profile },
    /// Blogs listed, awaiting post/delete/exit. `listed` holds the blog ids
    /// in the 1-indexed display order shown to the client.
    AwaitBlogAction { listed: Vec<u64> },
    AwaitBlogTitle,
    AwaitBlogText { title: String },
    /// Awaiting a 1-based index into `listed` to delete.
    AwaitBlogIndex { listed: Vec<u64> },
    /// Pending applicants listed, awaiting approve/reject/exit.
    AwaitApprovalAction,
    /// Awaiting the target username for an approve/reject decision.
    AwaitApprovalTarget { decision: ApprovalDecision },
    Terminated,
}

pub struct Session {
    state: SessionState,
    username: Option<String>,
    is_admin: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            username: None,
            is_admin: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Transition to the authenticated menu after a verified login.
    pub fn authenticate(&mut self, username: String, is_admin: bool) {
        self.username = Some(username);
        self.is_admin = is_admin;
        self.state = SessionState::Menu;
    }

    pub fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some() && self.state != SessionState::Terminated
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The logged-in username. Only called from authenticated states,
    /// where the dispatcher guarantees a login happened.
    pub fn current_user(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}
