//! Aggregate like/dislike counters

use serde::{Deserialize, Serialize};

use super::ReactionType;

/// Like/dislike tally for one target. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionCounts {
    pub const fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    /// Read the counter matching a reaction type
    pub const fn get(&self, field: ReactionType) -> i64 {
        match field {
            ReactionType::Like => self.likes,
            ReactionType::Dislike => self.dislikes,
        }
    }

    /// Apply a delta to one counter, flooring at zero
    pub fn apply(&mut self, field: ReactionType, delta: i64) {
        let slot = match field {
            ReactionType::Like => &mut self.likes,
            ReactionType::Dislike => &mut self.dislikes,
        };
        *slot = slot.saturating_add(delta).max(0);
    }

    /// Likes minus dislikes
    pub const fn score(&self) -> i64 {
        self.likes - self.dislikes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_floors_at_zero() {
        let mut counts = ReactionCounts::new(0, 2);
        counts.apply(ReactionType::Like, -1);
        assert_eq!(counts.likes, 0);

        counts.apply(ReactionType::Dislike, -1);
        assert_eq!(counts.dislikes, 1);
    }

    #[test]
    fn test_apply_increment() {
        let mut counts = ReactionCounts::default();
        counts.apply(ReactionType::Like, 1);
        counts.apply(ReactionType::Like, 1);
        counts.apply(ReactionType::Dislike, 1);
        assert_eq!(counts, ReactionCounts::new(2, 1));
        assert_eq!(counts.get(ReactionType::Like), 2);
        assert_eq!(counts.score(), 1);
    }
}
