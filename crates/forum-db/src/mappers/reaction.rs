//! Reaction entity <-> model mapper

use forum_core::{DomainError, Reaction, ReactionType, TargetKind};

use crate::models::ReactionModel;

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let target_kind: TargetKind = model.target_kind.parse()?;
        let reaction_type: ReactionType = model.reaction_type.parse().map_err(|_| {
            DomainError::InternalError(format!(
                "stored reaction_type {:?} for {}/{}",
                model.reaction_type, model.user_id, model.target_id
            ))
        })?;

        Ok(Reaction {
            user_id: model.user_id,
            target_id: model.target_id,
            target_kind,
            reaction_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Column values for inserting or overwriting a reaction row
pub struct ReactionInsert<'a> {
    pub user_id: &'a str,
    pub target_id: &'a str,
    pub target_kind: &'static str,
    pub reaction_type: &'static str,
}

impl<'a> ReactionInsert<'a> {
    pub fn new(reaction: &'a Reaction) -> Self {
        Self {
            user_id: &reaction.user_id,
            target_id: &reaction.target_id,
            target_kind: reaction.target_kind.as_str(),
            reaction_type: reaction.reaction_type.as_str(),
        }
    }
}

/// Convert a batch of rows, failing on the first malformed one
pub(crate) fn reactions_from_rows(rows: Vec<ReactionModel>) -> Result<Vec<Reaction>, DomainError> {
    rows.into_iter().map(Reaction::try_from).collect()
}
