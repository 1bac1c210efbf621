use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UserId;

/// Marketplace role, resolved once when the session is established
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Real-estate agency publishing listings
    Agency,
    /// Regular user browsing listings
    Consumer,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "agency" => Ok(Role::Agency),
            "consumer" => Ok(Role::Consumer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether this session may read the recommendations computed for `user_id`
    pub fn can_view_recommendations_for(&self, user_id: UserId) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Consumer => self.user_id == user_id,
            Role::Agency => false,
        }
    }
}
