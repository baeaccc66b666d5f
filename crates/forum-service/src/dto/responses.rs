//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use forum_core::{ReactionChoice, ReactionType, TargetKind};
use serde::Serialize;

// ============================================================================
// Reaction Responses
// ============================================================================

/// Like and dislike counters of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountsResponse {
    pub likes: i64,
    pub dislikes: i64,
}

/// A stored reaction record
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub user_id: String,
    pub target_id: String,
    pub target_kind: TargetKind,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of setting a reaction
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResultResponse {
    pub target_id: String,
    pub target_kind: TargetKind,
    /// The caller's state after the call
    pub reaction: ReactionChoice,
    pub counts: CountsResponse,
    pub changed: bool,
}

/// The caller's reaction on one target
#[derive(Debug, Clone, Serialize)]
pub struct UserReactionResponse {
    pub target_id: String,
    pub reaction: ReactionChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post with counters and the viewer's reaction
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub forum_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub counts: CountsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// Comment with counters and the viewer's reaction
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub content: String,
    pub counts: CountsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One node of a rendered comment tree
#[derive(Debug, Clone, Serialize)]
pub struct CommentNodeResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentNodeResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool) -> Self {
        Self {
            status: if storage_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: if storage_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_serialization() {
        let json = serde_json::to_value(CountsResponse {
            likes: 3,
            dislikes: 1,
        })
        .unwrap();
        assert_eq!(json["likes"], 3);
        assert_eq!(json["dislikes"], 1);
    }

    #[test]
    fn test_reaction_result_serialization() {
        let response = ReactionResultResponse {
            target_id: "p1".to_string(),
            target_kind: TargetKind::Post,
            reaction: ReactionChoice::None,
            counts: CountsResponse {
                likes: 0,
                dislikes: 0,
            },
            changed: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["target_kind"], "post");
        assert_eq!(json["reaction"], "none");
        assert_eq!(json["changed"], true);
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.storage, "healthy");
        assert!(ready.is_ready());

        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.storage, "unhealthy");
    }
}
