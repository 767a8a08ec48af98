//! Append-only training samples collected from pattern-tier blocks.
//!
//! Consumed by offline tooling outside this crate. `frequency` is written as
//! 1 on every append; there is no merge-by-pattern step.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Kind of submission the sample was taken from.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[sea_orm(string_value = "POST")]
    #[default]
    Post,
    #[sea_orm(string_value = "COMMENT")]
    Comment,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ai_learning_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub content_type: ContentType,
    #[sea_orm(column_type = "Text")]
    pub content_sample: String,
    pub block_reason: String,
    /// Source of the regex that triggered the block.
    #[sea_orm(column_type = "Text")]
    pub detected_pattern: String,
    pub frequency: i32,
    pub last_detected_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
