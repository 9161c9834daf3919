pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod scanner;
