//! studyhall — content moderation core for a study-group platform.
//!
//! The crate screens user-submitted post and comment text against an
//! operator-managed rule store ([`content_filter`]), records block decisions
//! in a reviewable ledger ([`moderation`]), accumulates learning samples for
//! later rule tuning, and exposes the operator workflow over HTTP ([`web`]).
//! Account management, content rendering, and the wider platform CRUD live
//! outside this crate and reach it through the seams in [`submission`] and
//! [`middleware`].

pub mod app_config;
pub mod content_filter;
pub mod db;
pub mod middleware;
pub mod moderation;
pub mod orm;
pub mod submission;
pub mod web;
