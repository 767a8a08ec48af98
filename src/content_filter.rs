//! Rule-based content filter engine.
//!
//! Screens post and comment text against three independently managed rule
//! tiers, in order: banned words, keywords (exact/partial/regex), and named
//! regex patterns. The first matching rule wins and produces a [`Verdict`];
//! remaining rules and tiers are not consulted. Rules are read from the store
//! on every evaluation, so operator changes apply on the next submission
//! without a reload step.
//!
//! A keyword or pattern match increments that rule's hit counter, and a
//! pattern match additionally appends a learning sample. These side effects
//! belong to evaluation itself and are not rolled back if the caller discards
//! the verdict.

use crate::app_config;
use crate::orm::ai_learning_data::{self, ContentType};
use crate::orm::blocked_posts::BlockType;
use crate::orm::{filter_keywords, filter_patterns, filter_words};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, ActiveValue::Set, DatabaseConnection};
use thiserror::Error;

/// Markup tags are stripped before any rule sees the text.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Outcome of screening one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Block(BlockVerdict),
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Block(_))
    }
}

/// Metadata attached to a block verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockVerdict {
    /// Human-readable reason, surfaced to the submitter.
    pub reason: String,
    pub block_type: BlockType,
    /// The word or keyword that matched, when a term tier fired.
    pub matched_term: Option<String>,
    /// Source of the regex that matched, when the pattern tier fired.
    pub matched_pattern: Option<String>,
}

/// Submission text after markup stripping and trimming.
#[derive(Debug)]
struct Normalized {
    title: Option<String>,
    content: String,
    /// Title and content joined with a space; content alone for comments.
    sample: String,
    /// `sample` case-folded once for the word and keyword tiers.
    folded: String,
}

fn normalize(title: Option<&str>, content: &str) -> Normalized {
    let content = strip_markup(content);
    let title = title.map(strip_markup);
    let sample = match &title {
        Some(title) => format!("{} {}", title, content),
        None => content.clone(),
    };
    let folded = sample.to_lowercase();

    Normalized {
        title,
        content,
        sample,
        folded,
    }
}

fn strip_markup(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

/// The rule that ended evaluation, if any.
#[derive(Debug, PartialEq)]
enum TierHit {
    Word { word: String },
    Keyword { id: i64, keyword: String },
    Pattern { id: i64, name: String, regex: String },
}

/// Walk the three tiers against normalized input. Pure; side effects are the
/// caller's concern.
fn evaluate_rules(
    words: &[filter_words::Model],
    keywords: &[filter_keywords::Model],
    patterns: &[filter_patterns::Model],
    input: &Normalized,
) -> Option<TierHit> {
    for word in words {
        if input.folded.contains(&word.word.to_lowercase()) {
            return Some(TierHit::Word {
                word: word.word.clone(),
            });
        }
    }

    for keyword in keywords {
        if keyword.mode.matches(&input.folded, &keyword.keyword) {
            return Some(TierHit::Keyword {
                id: keyword.id,
                keyword: keyword.keyword.clone(),
            });
        }
    }

    for pattern in patterns {
        let re = match RegexBuilder::new(&pattern.regex)
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                log::warn!(
                    "Skipping pattern rule '{}' with invalid regex: {}",
                    pattern.name,
                    e
                );
                continue;
            }
        };

        // A title-scoped pattern can never match a comment.
        let title_hit = pattern.scope.applies_to_title()
            && input
                .title
                .as_deref()
                .map(|title| re.is_match(title))
                .unwrap_or(false);
        let content_hit = pattern.scope.applies_to_content() && re.is_match(&input.content);

        if title_hit || content_hit {
            return Some(TierHit::Pattern {
                id: pattern.id,
                name: pattern.name.clone(),
                regex: pattern.regex.clone(),
            });
        }
    }

    None
}

/// Screen a submission against every active rule.
///
/// Pass `title` as `None` for comments; title-scoped pattern rules are
/// skipped in that case. Empty content is rejected rather than passed
/// unscreened.
pub async fn evaluate(
    db: &DatabaseConnection,
    title: Option<&str>,
    content: &str,
) -> Result<Verdict, FilterError> {
    if content.trim().is_empty() {
        return Err(FilterError::Validation(
            "Content must not be empty".to_string(),
        ));
    }

    let input = normalize(title, content);

    let words = filter_words::Entity::find()
        .filter(filter_words::Column::IsActive.eq(true))
        .all(db)
        .await?;
    let keywords = filter_keywords::Entity::find()
        .filter(filter_keywords::Column::IsActive.eq(true))
        .all(db)
        .await?;
    let patterns = filter_patterns::Entity::find()
        .filter(filter_patterns::Column::IsActive.eq(true))
        .all(db)
        .await?;

    let hit = match evaluate_rules(&words, &keywords, &patterns, &input) {
        Some(hit) => hit,
        None => return Ok(Verdict::Pass),
    };

    let verdict = match hit {
        TierHit::Word { word } => BlockVerdict {
            reason: format!("Profanity detected: {}", word),
            block_type: BlockType::Profanity,
            matched_term: Some(word),
            matched_pattern: None,
        },
        TierHit::Keyword { id, keyword } => {
            bump_keyword_count(db, id).await?;
            BlockVerdict {
                reason: format!("Banned keyword detected: {}", keyword),
                block_type: BlockType::Keyword,
                matched_term: Some(keyword),
                matched_pattern: None,
            }
        }
        TierHit::Pattern { id, name, regex } => {
            bump_pattern_count(db, id).await?;
            let verdict = BlockVerdict {
                reason: format!("Blocked pattern detected: {}", name),
                block_type: BlockType::Pattern,
                matched_term: None,
                matched_pattern: Some(regex.clone()),
            };
            append_learning_sample(db, &input, &verdict.reason, &regex).await?;
            verdict
        }
    };

    log::info!("Submission blocked: {}", verdict.reason);
    Ok(Verdict::Block(verdict))
}

/// Atomic `count = count + 1`; a read-modify-write here would drop concurrent
/// hits on the same rule.
async fn bump_keyword_count(db: &DatabaseConnection, id: i64) -> Result<(), sea_orm::DbErr> {
    filter_keywords::Entity::update_many()
        .col_expr(
            filter_keywords::Column::BlockCount,
            Expr::col(filter_keywords::Column::BlockCount).add(1),
        )
        .filter(filter_keywords::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

async fn bump_pattern_count(db: &DatabaseConnection, id: i64) -> Result<(), sea_orm::DbErr> {
    filter_patterns::Entity::update_many()
        .col_expr(
            filter_patterns::Column::BlockCount,
            Expr::col(filter_patterns::Column::BlockCount).add(1),
        )
        .filter(filter_patterns::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

async fn append_learning_sample(
    db: &DatabaseConnection,
    input: &Normalized,
    reason: &str,
    pattern: &str,
) -> Result<(), sea_orm::DbErr> {
    let cap = app_config::moderation().learning_sample_max_len;
    let now = Utc::now().naive_utc();

    ai_learning_data::ActiveModel {
        content_type: Set(if input.title.is_some() {
            ContentType::Post
        } else {
            ContentType::Comment
        }),
        content_sample: Set(truncate_chars(&input.sample, cap)),
        block_reason: Set(reason.to_string()),
        detected_pattern: Set(pattern.to_string()),
        frequency: Set(1),
        last_detected_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::filter_keywords::KeywordMode;
    use crate::orm::filter_patterns::PatternScope;
    use crate::orm::filter_words::WordCategory;

    fn word(text: &str) -> filter_words::Model {
        let now = Utc::now().naive_utc();
        filter_words::Model {
            id: 1,
            word: text.to_string(),
            category: WordCategory::Custom,
            is_active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn keyword(id: i64, text: &str, mode: KeywordMode) -> filter_keywords::Model {
        let now = Utc::now().naive_utc();
        filter_keywords::Model {
            id,
            keyword: text.to_string(),
            mode,
            description: None,
            is_active: true,
            block_count: 0,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn pattern(id: i64, name: &str, regex: &str, scope: PatternScope) -> filter_patterns::Model {
        let now = Utc::now().naive_utc();
        filter_patterns::Model {
            id,
            name: name.to_string(),
            regex: regex.to_string(),
            scope,
            description: None,
            is_active: true,
            block_count: 0,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>hello</b> world"), "hello world");
        assert_eq!(strip_markup("  <p>trimmed</p>  "), "trimmed");
        assert_eq!(strip_markup("plain"), "plain");
    }

    #[test]
    fn test_normalize_joins_and_folds() {
        let input = normalize(Some("My Title"), "Some CONTENT");
        assert_eq!(input.sample, "My Title Some CONTENT");
        assert_eq!(input.folded, "my title some content");
    }

    #[test]
    fn test_normalize_comment_has_no_title() {
        let input = normalize(None, "Just a comment");
        assert!(input.title.is_none());
        assert_eq!(input.sample, "Just a comment");
    }

    #[test]
    fn test_word_tier_is_case_insensitive_substring() {
        let words = [word("SpamWord")];
        let input = normalize(None, "this has SPAMWORD inside");
        let hit = evaluate_rules(&words, &[], &[], &input);
        assert_eq!(
            hit,
            Some(TierHit::Word {
                word: "SpamWord".to_string()
            })
        );
    }

    #[test]
    fn test_word_tier_wins_over_pattern_tier() {
        let words = [word("badstuff")];
        let patterns = [pattern(5, "bad", "badstuff", PatternScope::Both)];
        let input = normalize(Some("t"), "contains badstuff here");
        match evaluate_rules(&words, &[], &patterns, &input) {
            Some(TierHit::Word { .. }) => {}
            other => panic!("Expected word hit, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_keyword_requires_whole_text() {
        let keywords = [keyword(2, "buy now", KeywordMode::Exact)];
        let whole = normalize(None, "buy now");
        assert!(evaluate_rules(&[], &keywords, &[], &whole).is_some());

        let partial = normalize(None, "please buy now for discount");
        assert!(evaluate_rules(&[], &keywords, &[], &partial).is_none());
    }

    #[test]
    fn test_title_scoped_pattern_skipped_for_comments() {
        let patterns = [pattern(3, "title-only", "forbidden", PatternScope::Title)];
        let comment = normalize(None, "forbidden words here");
        assert!(evaluate_rules(&[], &[], &patterns, &comment).is_none());

        let post = normalize(Some("forbidden words"), "clean body");
        assert!(evaluate_rules(&[], &[], &patterns, &post).is_some());
    }

    #[test]
    fn test_invalid_pattern_does_not_abort_evaluation() {
        let patterns = [
            pattern(4, "broken", "(((", PatternScope::Both),
            pattern(5, "phone-number", r"\d{3}-\d{4}-\d{4}", PatternScope::Both),
        ];
        let input = normalize(None, "call me at 010-1234-5678");
        match evaluate_rules(&[], &[], &patterns, &input) {
            Some(TierHit::Pattern { id, .. }) => assert_eq!(id, 5),
            other => panic!("Expected pattern hit, got {:?}", other),
        }
    }

    #[test]
    fn test_no_rules_means_no_hit() {
        let input = normalize(Some("anything"), "at all");
        assert!(evaluate_rules(&[], &[], &[], &input).is_none());
    }

    #[test]
    fn test_truncate_chars_on_char_boundary() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
