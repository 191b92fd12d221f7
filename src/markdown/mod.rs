//! The on-disk stakeholder document format.
//!
//! ```text
//! ---
//! version: "1.0"
//! updated_at: "2026-01-01T00:00:00.000Z"
//! ---
//!
//! # Stakeholder: End User
//!
//! ## Basic Info
//! - **Role**: Daily user
//! - **Description**: Non-technical users
//!
//! ## Goals
//! - Complete tasks quickly
//!
//! ## Pain Points
//! - Confusing onboarding
//!
//! ## Priorities
//! 1. Ease of use
//!
//! ---
//!
//! # Goal-Issue Links
//!
//! ## End User
//! - **Complete tasks quickly**: #42
//!
//! # Conflict Resolutions
//!
//! ## 2026-01-15: End User vs Developer
//! - **Conflict**: ...
//! - **Decision**: ...
//! - **Rationale**: ...
//! ```
//!
//! The Goal-Issue Links section is the only place linkage is read from. It is
//! regenerated from [`StakeholderGoal::linked_issues`](crate::models::StakeholderGoal)
//! on every write.

mod escape;
pub mod frontmatter;
pub mod lexer;
mod parser;
mod serializer;

pub use escape::{escape_goal_text, unescape_goal_text};
pub use parser::{parse_document, parse_link_line};
pub use serializer::serialize_document;
