//! Keyword entity, the second tier of the content filter.
//!
//! Each keyword carries a matching mode applied against the case-folded
//! submission text. `block_count` tracks how many submissions the rule has
//! blocked.

use regex::RegexBuilder;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// How a keyword is compared against the evaluated text.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeywordMode {
    /// The entire normalized text must equal the keyword.
    #[sea_orm(string_value = "EXACT")]
    Exact,
    /// Substring match.
    #[sea_orm(string_value = "PARTIAL")]
    #[default]
    Partial,
    /// The keyword is a regex, compiled case-insensitive.
    #[sea_orm(string_value = "REGEX")]
    Regex,
}

impl KeywordMode {
    /// Whether `keyword` under this mode matches the case-folded `text`.
    ///
    /// A keyword whose regex fails to compile never matches; one bad rule
    /// must not abort evaluation of the remaining rules.
    pub fn matches(&self, text: &str, keyword: &str) -> bool {
        match self {
            KeywordMode::Exact => text == keyword.to_lowercase(),
            KeywordMode::Partial => text.contains(&keyword.to_lowercase()),
            KeywordMode::Regex => {
                match RegexBuilder::new(keyword).case_insensitive(true).build() {
                    Ok(re) => re.is_match(text),
                    Err(e) => {
                        log::warn!("Skipping keyword rule with invalid regex '{}': {}", keyword, e);
                        false
                    }
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "filter_keywords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub keyword: String,
    pub mode: KeywordMode,
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
