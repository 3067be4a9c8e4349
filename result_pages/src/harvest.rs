// Reading the candidate rows of a result table.

use log::{debug, error};
use scraper::ElementRef;
use snafu::OptionExt;

use crate::dom::*;
use crate::model::*;

const HEADER_NAME: &str = "Name";
const HEADER_VOTES: &str = "SUM of Vote";

/// Reads all the rows of a category table, skipping its header row.
///
/// Bold text in the name cell marks an elected candidate. Repeated header rows are
/// dropped. Any other vote count that is not an integer fails the whole table.
pub fn harvest_rows(rows: &[ElementRef<'_>], category: Category) -> ExtractResult<Vec<CandidateResult>> {
    let mut res: Vec<CandidateResult> = Vec::new();
    for row in rows.iter().skip(1) {
        if let Some(result) = harvest_row(*row, category)? {
            res.push(result);
        }
    }
    debug!("harvest_rows: {}: {} candidates", category, res.len());
    Ok(res)
}

fn harvest_row(row: ElementRef<'_>, category: Category) -> ExtractResult<Option<CandidateResult>> {
    let cells: Vec<ElementRef<'_>> = row.select(&selector("td")?).collect();
    let (name_cell, vote_cell) = match cells.as_slice() {
        [name_cell, vote_cell] => (*name_cell, *vote_cell),
        _ => {
            return StructuralMismatchSnafu {
                what: format!("two cells in row {}", row.html()),
            }
            .fail();
        }
    };

    let emphasis = selector(EMPHASIS)?;
    let (name_holder, is_winner) = match name_cell.select(&emphasis).next() {
        Some(strong) => (strong, true),
        None => (name_cell, false),
    };
    let name = first_text(name_holder).context(StructuralMismatchSnafu {
        what: format!("candidate name in row {}", row.html()),
    })?;

    let vote_holder = vote_cell.select(&emphasis).next().unwrap_or(vote_cell);
    let vote_text = single_string(vote_holder);

    if name == HEADER_NAME && vote_text == Some(HEADER_VOTES) {
        debug!("harvest_row: skipping repeated header row");
        return Ok(None);
    }

    let vote_count = match vote_text.and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(x) => x,
        None => {
            error!("Unreadable vote count in row: {}", row.html());
            return VoteParseSnafu {
                text: vote_text.map(|s| s.to_string()),
                row: row.html(),
            }
            .fail();
        }
    };

    Ok(Some(CandidateResult {
        name: name.to_string(),
        category,
        vote_count,
        is_winner,
    }))
}
