//! Named regex pattern entity, the third tier of the content filter.
//!
//! A pattern's scope decides whether it runs against the title, the body, or
//! both. Invalid regex sources are tolerated at evaluation time and treated
//! as non-matching.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Which part of a submission a pattern is applied to.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternScope {
    #[sea_orm(string_value = "TITLE")]
    Title,
    #[sea_orm(string_value = "CONTENT")]
    Content,
    #[sea_orm(string_value = "BOTH")]
    #[default]
    Both,
}

impl PatternScope {
    pub fn applies_to_title(&self) -> bool {
        matches!(self, PatternScope::Title | PatternScope::Both)
    }

    pub fn applies_to_content(&self) -> bool {
        matches!(self, PatternScope::Content | PatternScope::Both)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "filter_patterns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub regex: String,
    pub scope: PatternScope,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub block_count: i32,
    pub created_by: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    CreatedByUser,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedByUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
