//! Reaction types
//!
//! `ReactionType` is what gets persisted. `ReactionChoice` is what callers ask for:
//! it adds the `None` state, which is represented in storage by the absence of a record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A persisted reaction (there is no persisted "none")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Dislike,
}

impl ReactionType {
    /// Storage/wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(DomainError::InvalidReactionType(s.to_string())),
        }
    }
}

/// The reaction state a user asks for on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionChoice {
    #[default]
    None,
    Like,
    Dislike,
}

impl ReactionChoice {
    /// The record type this choice persists, if any
    pub const fn reaction_type(self) -> Option<ReactionType> {
        match self {
            Self::None => None,
            Self::Like => Some(ReactionType::Like),
            Self::Dislike => Some(ReactionType::Dislike),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl From<Option<ReactionType>> for ReactionChoice {
    fn from(value: Option<ReactionType>) -> Self {
        match value {
            None => Self::None,
            Some(ReactionType::Like) => Self::Like,
            Some(ReactionType::Dislike) => Self::Dislike,
        }
    }
}

impl From<ReactionType> for ReactionChoice {
    fn from(value: ReactionType) -> Self {
        Self::from(Some(value))
    }
}

impl fmt::Display for ReactionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(DomainError::InvalidReactionType(s.to_string())),
        }
    }
}
