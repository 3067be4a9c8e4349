/*!
Extraction of the convention results published for each Assembly District.

The result pages were written by hand and their structure drifted over time. This
crate recovers, for one page, the district number, the executive board winner and
the candidates of both categories with their vote counts.

```
use result_pages::{extract_html, Category};

let page = r#"
<h2>Assembly District 12</h2>
<div><h2>Executive Board</h2>
<table><tr><td>Winner</td><td>Jane Doe</td></tr></table></div>
<div><h2>Self Identified Female</h2>
<table><tr><td>Name</td><td>SUM of Vote</td></tr>
<tr><td><strong>Jane Doe</strong></td><td>120</td></tr></table></div>
<div><h2>Other Than Self Identified Female</h2>
<table><tr><td>Name</td><td>SUM of Vote</td></tr>
<tr><td>John Roe</td><td>80</td></tr></table></div>
"#;

let extraction = extract_html(page)?.expect("not a deferred page");
assert_eq!(extraction.district_number, 12);
assert_eq!(extraction.executive_board_winner.as_deref(), Some("Jane Doe"));
assert_eq!(extraction.results[0].category, Category::SelfIdentifiedFemale);
# Ok::<(), result_pages::ExtractError>(())
```
*/

mod dom;
mod harvest;
mod layout;
mod model;

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use scraper::Html;
use snafu::OptionExt;
use std::cmp::Reverse;
use std::collections::HashSet;

pub use crate::dom::{find_ancestor, nth_ancestor, TreeNode, MAX_ANCESTOR_DEPTH};
pub use crate::layout::Layout;
pub use crate::model::*;

use crate::dom::{first_text, selector, single_string};
use crate::harvest::harvest_rows;
use crate::layout::locate_sections;

/// The notice published instead of the results for a district whose count was delayed.
pub const DEFERRAL_NOTICE: &str = "Results will be made public on February 15th, 2021.";

lazy_static! {
    static ref DISTRICT_HEADING: Regex = Regex::new(r"^Assembly District ([0-9]+)").unwrap();
    static ref DISTRICT_HREF: Regex = Regex::new(r"/ad-([0-9]+)").unwrap();
}

/// Parses and extracts a result page.
pub fn extract_html(source: &str) -> ExtractResult<Option<DistrictExtraction>> {
    let document = Html::parse_document(source);
    extract_document(&document)
}

/// Extracts the results of one district.
///
/// Returns `None` for a page that only announces that the results are delayed.
pub fn extract_document(document: &Html) -> ExtractResult<Option<DistrictExtraction>> {
    if is_deferred(document)? {
        warn!("Skipping page: results are not published yet");
        return Ok(None);
    }

    let sections = locate_sections(document)?;
    let executive_board_winner =
        single_string(sections.executive_board_cell).map(|s| s.to_string());
    debug!(
        "extract_document: executive board winner: {:?}",
        executive_board_winner
    );

    let district_number = resolve_district_number(document, sections.district_heading)?;

    let mut results: Vec<CandidateResult> = Vec::new();
    for (rows, category) in sections.category_rows.iter().zip(Category::ALL) {
        results.extend(harvest_rows(rows, category)?);
    }
    warn_duplicates(district_number, &results);
    order_results(&mut results);

    Ok(Some(DistrictExtraction {
        district_number,
        executive_board_winner,
        results,
    }))
}

fn is_deferred(document: &Html) -> ExtractResult<bool> {
    let notice = document
        .select(&selector("h3")?)
        .next()
        .and_then(single_string);
    Ok(notice == Some(DEFERRAL_NOTICE))
}

/// Reads the district number from the page heading.
///
/// Some headings are only "Assembly District " without any number. The canonical link
/// of these pages ends with the number instead, like `/ad-99`.
fn resolve_district_number(document: &Html, heading: scraper::ElementRef<'_>) -> ExtractResult<u32> {
    let from_heading = first_text(heading)
        .and_then(|text| DISTRICT_HEADING.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    if let Some(x) = from_heading {
        return Ok(x);
    }

    debug!("district_number: no number in heading, using the canonical link");
    let href = document
        .select(&selector(r#"link[rel~="canonical"]"#)?)
        .next()
        .and_then(|link| link.value().attr("href"))
        .context(StructuralMismatchSnafu {
            what: "district number in heading or canonical link",
        })?;
    DISTRICT_HREF
        .captures(href)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .context(StructuralMismatchSnafu {
            what: format!("district number in canonical link {:?}", href),
        })
}

// Duplicated candidates are kept as they are published.
fn warn_duplicates(district_number: u32, results: &[CandidateResult]) {
    let mut seen: HashSet<(&str, Category)> = HashSet::new();
    for r in results.iter() {
        if !seen.insert((r.name.as_str(), r.category)) {
            warn!(
                "AD-{}: candidate {:?} appears more than once in {}",
                district_number, r.name, r.category
            );
        }
    }
}

/// The report order of a result.
///
/// Winners come first, by category priority. All the other candidates come after them,
/// whatever their category. Within each group, higher vote counts come first.
pub fn ordering_key(result: &CandidateResult) -> (u8, usize, Reverse<u64>) {
    if result.is_winner {
        (0, result.category.rank(), Reverse(result.vote_count))
    } else {
        (1, Category::ALL.len(), Reverse(result.vote_count))
    }
}

/// Sorts the results in report order. The sort is stable.
pub fn order_results(results: &mut [CandidateResult]) {
    results.sort_by_key(ordering_key);
}
