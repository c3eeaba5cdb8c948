use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub url: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedResults {
    pub records: Vec<Record>,
    pub skipped_blocks: usize,
}
