use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ListingId, UserId};

/// What the user did with a listing. Every kind weighs the same in scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Click,
    Contact,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Contact => "contact",
        }
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(InteractionKind::View),
            "click" => Ok(InteractionKind::Click),
            "contact" => Ok(InteractionKind::Contact),
            other => Err(format!("unknown interaction kind '{}'", other)),
        }
    }
}

/// One row of the append-only interaction log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(user_id: UserId, listing_id: ListingId, kind: InteractionKind) -> Self {
        Self {
            user_id,
            listing_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// A listing bookmarked by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
}
