//! Stack templates
//!
//! Named orchestration templates (raw compose text) behind a thin
//! authorization gate: reads are open, mutations are admin-only.

pub mod service;
pub mod store;

pub use service::TemplateService;
pub use store::{FsTemplateStore, StackTemplate, TemplateStore};
