//! Banned word entity, the first tier of the content filter.
//!
//! A word blocks any submission whose normalized text contains it, whatever
//! its category. Words are disabled through `is_active` rather than deleted;
//! re-adding an existing word reactivates it and updates its category.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Rough classification of why a word is banned.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordCategory {
    #[sea_orm(string_value = "PROFANITY")]
    Profanity,
    #[sea_orm(string_value = "SPAM")]
    Spam,
    #[sea_orm(string_value = "AD")]
    Ad,
    #[sea_orm(string_value = "CUSTOM")]
    #[default]
    Custom,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "filter_words")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stored lower-cased; comparisons are case-folded.
    #[sea_orm(unique)]
    pub word: String,
    pub category: WordCategory,
    pub is_active: bool,
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
