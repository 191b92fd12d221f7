//! Markdown-backed stakeholder records.
//!
//! Each project keeps its stakeholders, their goals, pain points and ranked
//! priorities, goal-to-issue links and a conflict resolution log in one
//! human-editable markdown file. [`StakeholderStore`] reads and writes that
//! file whole; [`StakeholderRegistry`] hands out one store per project.

pub mod config;
pub mod error;
pub mod lookup;
pub mod markdown;
pub mod mcp;
pub mod models;
pub mod registry;
pub mod store;
pub mod tree_render;

pub use config::StoreConfig;
pub use error::StoreError;
pub use registry::StakeholderRegistry;
pub use store::StakeholderStore;
