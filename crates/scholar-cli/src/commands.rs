pub mod article;
pub mod models;
pub mod search;
pub mod session;
pub mod summarize;
