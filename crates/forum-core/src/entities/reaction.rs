//! Reaction entity - one user's like or dislike on a post or comment

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionChoice, ReactionType, TargetKind, TargetRef};

/// Reaction entity. At most one exists per (user_id, target_id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: String,
    pub target_id: String,
    pub target_kind: TargetKind,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(user_id: impl Into<String>, target: &TargetRef, reaction_type: ReactionType) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            target_id: target.id.clone(),
            target_kind: target.kind,
            reaction_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// The target this reaction points at
    pub fn target(&self) -> TargetRef {
        TargetRef::new(self.target_id.clone(), self.target_kind)
    }

    /// Switch the reaction type in place
    pub fn switch_to(&mut self, reaction_type: ReactionType) {
        self.reaction_type = reaction_type;
        self.updated_at = Utc::now();
    }

    #[inline]
    pub fn is_like(&self) -> bool {
        self.reaction_type == ReactionType::Like
    }
}

/// Planned change for one toggle, derived from the prior record and the desired choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTransition {
    /// Desired state already holds
    Unchanged,
    /// No prior record; create one
    Create(ReactionType),
    /// Prior record exists and the desired state is None
    Remove(ReactionType),
    /// Prior record of the other type
    Switch {
        from: ReactionType,
        to: ReactionType,
    },
}

impl ReactionTransition {
    /// Plan the transition from `prev` to `desired`
    pub fn plan(prev: Option<ReactionType>, desired: ReactionChoice) -> Self {
        match (prev, desired.reaction_type()) {
            (None, None) => Self::Unchanged,
            (Some(from), None) => Self::Remove(from),
            (None, Some(to)) => Self::Create(to),
            (Some(from), Some(to)) if from == to => Self::Unchanged,
            (Some(from), Some(to)) => Self::Switch { from, to },
        }
    }

    /// Counter adjustments this transition requires, in application order
    pub fn counter_deltas(self) -> Vec<(ReactionType, i64)> {
        match self {
            Self::Unchanged => Vec::new(),
            Self::Create(t) => vec![(t, 1)],
            Self::Remove(t) => vec![(t, -1)],
            Self::Switch { from, to } => vec![(from, -1), (to, 1)],
        }
    }

    #[inline]
    pub fn is_unchanged(self) -> bool {
        self == Self::Unchanged
    }
}
