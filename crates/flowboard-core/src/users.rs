//! Roster of assignable users

use crate::{Error, Result, User, seed};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Vec<User>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn sample() -> Self {
        Self::new(seed::sample_users())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Display name for an assignee id; dangling ids resolve to None.
    pub fn name_of(&self, user_id: &str) -> Option<&str> {
        self.get(user_id).map(|u| u.name.as_str())
    }

    /// Append a user. The caller supplies a unique id.
    pub fn add_user(&mut self, user: User) {
        debug!(id = %user.id, "user added");
        self.users.push(user);
    }

    pub fn remove_user(&mut self, user_id: &str) -> Result<User> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
        debug!(id = user_id, "user removed");
        Ok(self.users.remove(index))
    }
}
