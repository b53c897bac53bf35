pub mod base;
pub mod ollama;

#[cfg(test)]
pub mod mock;
