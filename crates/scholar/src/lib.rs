pub mod agents;
pub mod citations;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod prompt_template;
pub mod providers;
pub mod search;
