pub mod agent;
pub mod arxiv;
pub mod backend;
pub mod scholar;
pub mod validator;
pub mod web;

pub use agent::SearchAgent;
pub use backend::SearchBackend;
pub use validator::{RelevanceValidator, StructuralValidator};
