//! Blocking ledger entry for a comment.
//!
//! Mirrors `blocked_posts` with a content-only snapshot plus the id of the
//! post the comment was made under.

use sea_orm::entity::prelude::*;
use serde::Serialize;

pub use super::blocked_posts::{BlockStatus, BlockType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "blocked_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the blocked comment; the comment row stays behind soft-deleted.
    #[sea_orm(unique)]
    pub comment_id: i64,
    /// Parent post the comment was submitted under.
    pub post_id: i64,
    pub user_id: i32,
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
