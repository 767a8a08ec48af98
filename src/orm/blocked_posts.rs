//! Blocking ledger entry for a post.
//!
//! One row per blocked post, keyed by the unique `post_id`. The snapshot
//! columns are immutable once written; the review columns form a small state
//! machine driven by operators (`BLOCKED` -> `RESTORED`, no way back).

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Which kind of rule (or external detector) blocked the content.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    #[sea_orm(string_value = "PROFANITY")]
    Profanity,
    #[sea_orm(string_value = "SPAM")]
    Spam,
    #[sea_orm(string_value = "AD")]
    Ad,
    #[sea_orm(string_value = "PATTERN")]
    Pattern,
    #[sea_orm(string_value = "KEYWORD")]
    Keyword,
    #[sea_orm(string_value = "AI_DETECTED")]
    AiDetected,
}

/// Review state of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockStatus {
    #[sea_orm(string_value = "BLOCKED")]
    #[default]
    Blocked,
    #[sea_orm(string_value = "RESTORED")]
    Restored,
    /// Reserved for a pre-block review queue; nothing assigns it today.
    #[sea_orm(string_value = "PENDING")]
    Pending,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "blocked_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the blocked post. Not a foreign key: the post row itself is
    /// deleted when the block lands.
    #[sea_orm(unique)]
    pub post_id: i64,
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub block_reason: String,
    pub block_type: BlockType,
    /// JSON-encoded list of the matched term(s).
    #[sea_orm(column_type = "Text", nullable)]
    pub detected_keywords: Option<String>,
    pub ai_confidence: Option<f32>,
    pub is_reviewed: bool,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime>,
    pub status: BlockStatus,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Submitter,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Reviewer,
}

impl ActiveModelBehavior for ActiveModel {}
