pub mod message;
pub mod results;
pub mod search;
