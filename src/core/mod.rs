pub mod feed;
pub mod scholar;
