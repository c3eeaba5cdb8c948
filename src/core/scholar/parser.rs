use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::types::{ParsedResults, Record};

pub const FALLBACK_TITLE: &str = "No title";

static RESULT_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.gs_r.gs_or.gs_scl").expect("selector must parse"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.gs_rt").expect("selector must parse"));
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("selector must parse"));
static AUTHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.gs_a").expect("selector must parse"));
static ABSTRACT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.gs_rs").expect("selector must parse"));

pub fn parse_results(html: &str) -> ParsedResults {
    let document = Html::parse_document(html);
    let mut results = ParsedResults::default();

    for (index, block) in document.select(&RESULT_BLOCK).enumerate() {
        match extract_record(block) {
            Some(record) => results.records.push(record),
            None => {
                results.skipped_blocks += 1;
                tracing::warn!(block = index, "skipping result block with missing fields");
            }
        }
    }

    results
}

fn extract_record(block: ElementRef<'_>) -> Option<Record> {
    let title_element = block.select(&TITLE).next();
    let title = match title_element {
        Some(element) => element_text(element),
        None => FALLBACK_TITLE.to_string(),
    };
    let url = title_element
        .and_then(|element| element.select(&TITLE_LINK).next())
        .and_then(|anchor| anchor.value().attr("href"))
        .unwrap_or_default()
        .to_string();
    let authors = element_text(block.select(&AUTHORS).next()?);
    let abstract_text = element_text(block.select(&ABSTRACT).next()?);

    Some(Record {
        title,
        url,
        authors,
        abstract_text,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
