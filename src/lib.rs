pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod due_date;
pub mod error;
pub mod extract;
pub mod labels;
pub mod models;
pub mod workflow;

pub use error::Error;
pub use workflow::{JournalWorkflow, Phase};
