pub mod fetcher;
pub mod headers;
pub mod parser;
pub mod types;
