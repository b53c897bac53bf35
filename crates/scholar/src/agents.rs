pub mod base;
pub mod manager;
pub mod refiner;
pub mod sanitize_data;
pub mod summarize;
pub mod validators;
pub mod write_article;

pub use base::RequestOverrides;
pub use manager::{Agent, AgentKind, AgentManager};
