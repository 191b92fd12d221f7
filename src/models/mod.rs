//! Domain models for the stakeholder store.
//!
//! # Core Concepts
//!
//! - [`StakeholderFile`]: The aggregate root. One per project, persisted as a
//!   single markdown document and always read and written whole.
//! - [`Stakeholder`]: A named party with a role, goals, pain points and ranked
//!   priorities. The name is the record key.
//! - [`StakeholderGoal`]: A goal plus the ordered set of issue numbers linked to it.
//! - [`ConflictResolution`]: Append-only log of decisions between two stakeholders.

mod conflict;
mod document;
mod stakeholder;

pub use conflict::*;
pub use document::*;
pub use stakeholder::*;
