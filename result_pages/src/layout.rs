// Detection of the layout of a result page, and location of its result tables.
//
// The pages were written by hand over time. The recent ones use one h2 heading per
// section (district, executive board, then the two categories). The older ones only
// have the district heading, and label the sections with bold text inside the tables.
// Some pages sit in between, with a heading for the executive board only.

use log::debug;
use scraper::{ElementRef, Html};
use snafu::OptionExt;

use crate::dom::*;
use crate::model::*;

const EXECUTIVE_BOARD_LABEL: &str = "Executive Board";
const WINNER_LABEL: &str = "Winner";

#[derive(Debug, Clone, Copy)]
pub enum Layout<'a> {
    /// District, executive board and both category headings are present.
    HeadingIndexed {
        executive_board: ElementRef<'a>,
        primary: ElementRef<'a>,
        secondary: ElementRef<'a>,
    },
    /// The executive board has a heading, the categories are labeled in their tables.
    Mixed { executive_board: ElementRef<'a> },
    /// Only the district heading: every section is found through its label.
    LabelIndexed,
}

/// The parts of a result page needed to build the results.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    pub district_heading: ElementRef<'a>,
    pub executive_board_cell: ElementRef<'a>,
    /// The table rows of each category, header row included, in category order.
    pub category_rows: [Vec<ElementRef<'a>>; 2],
}

impl<'a> Layout<'a> {
    /// Chooses the layout from the section headings, after the district heading.
    pub fn detect(headings: &[ElementRef<'a>]) -> Layout<'a> {
        match headings {
            [executive_board, primary, secondary, ..] => Layout::HeadingIndexed {
                executive_board: *executive_board,
                primary: *primary,
                secondary: *secondary,
            },
            [executive_board, ..] => Layout::Mixed {
                executive_board: *executive_board,
            },
            [] => Layout::LabelIndexed,
        }
    }
}

pub fn locate_sections(document: &Html) -> ExtractResult<Sections<'_>> {
    let headings: Vec<ElementRef<'_>> = document.select(&selector("h2")?).collect();
    let (district_heading, rest) = headings.split_first().context(StructuralMismatchSnafu {
        what: "district heading",
    })?;
    let layout = Layout::detect(rest);
    debug!(
        "locate_sections: {} headings, {} layout",
        headings.len(),
        layout_name(&layout)
    );

    let (executive_board_cell, category_rows) = match layout {
        Layout::HeadingIndexed {
            executive_board,
            primary,
            secondary,
        } => (
            executive_board_cell_by_heading(executive_board)?,
            [rows_by_heading(primary)?, rows_by_heading(secondary)?],
        ),
        Layout::Mixed { executive_board } => (
            executive_board_cell_by_heading(executive_board)?,
            rows_by_labels(document)?,
        ),
        Layout::LabelIndexed => (
            executive_board_cell_by_label(document)?,
            rows_by_labels(document)?,
        ),
    };

    Ok(Sections {
        district_heading: *district_heading,
        executive_board_cell,
        category_rows,
    })
}

fn layout_name(layout: &Layout<'_>) -> &'static str {
    match layout {
        Layout::HeadingIndexed { .. } => "heading-indexed",
        Layout::Mixed { .. } => "mixed",
        Layout::LabelIndexed => "label-indexed",
    }
}

fn container_of(heading: ElementRef<'_>) -> ExtractResult<ElementRef<'_>> {
    find_container(heading).context(StructuralMismatchSnafu {
        what: format!("table for heading {:?}", heading.text().collect::<String>()),
    })
}

/// The winner cell is the last cell of the section that is not the "Winner" label.
fn executive_board_cell_by_heading(heading: ElementRef<'_>) -> ExtractResult<ElementRef<'_>> {
    let container = container_of(heading)?;
    container
        .select(&selector("td")?)
        .filter(|td| first_text(*td) != Some(WINNER_LABEL))
        .last()
        .context(StructuralMismatchSnafu {
            what: "executive board winner cell",
        })
}

fn rows_by_heading(heading: ElementRef<'_>) -> ExtractResult<Vec<ElementRef<'_>>> {
    let container = container_of(heading)?;
    Ok(container.select(&selector("tr")?).collect())
}

/// The last emphasized run whose text is exactly the label.
fn find_label<'a>(document: &'a Html, label: &str) -> ExtractResult<ElementRef<'a>> {
    document
        .select(&selector(EMPHASIS)?)
        .filter(|e| first_text(*e) == Some(label))
        .last()
        .context(StructuralMismatchSnafu {
            what: format!("label {:?}", label),
        })
}

fn labeled_cell<'a>(document: &'a Html, label: &str) -> ExtractResult<ElementRef<'a>> {
    let emphasis = find_label(document, label)?;
    find_parent_tag(emphasis, "td").context(StructuralMismatchSnafu {
        what: format!("cell around label {:?}", label),
    })
}

fn executive_board_cell_by_label(document: &Html) -> ExtractResult<ElementRef<'_>> {
    labeled_cell(document, EXECUTIVE_BOARD_LABEL)
}

/// The label sits in a cell of the first row: the rows of the category are the ones
/// of the enclosing row group.
fn rows_by_label<'a>(document: &'a Html, category: Category) -> ExtractResult<Vec<ElementRef<'a>>> {
    let cell = labeled_cell(document, category.label())?;
    let table = nth_ancestor(cell, 2).context(StructuralMismatchSnafu {
        what: format!("table around label {:?}", category.label()),
    })?;
    Ok(table.select(&selector("tr")?).collect())
}

fn rows_by_labels(document: &Html) -> ExtractResult<[Vec<ElementRef<'_>>; 2]> {
    let [primary, secondary] = Category::ALL;
    Ok([
        rows_by_label(document, primary)?,
        rows_by_label(document, secondary)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_heading_count() {
        let doc = Html::parse_document("<h2>A</h2><h2>B</h2><h2>C</h2><h2>D</h2>");
        let headings: Vec<ElementRef> = doc.select(&selector("h2").unwrap()).collect();
        assert!(matches!(
            Layout::detect(&headings[1..]),
            Layout::HeadingIndexed { .. }
        ));
        assert!(matches!(Layout::detect(&headings[1..3]), Layout::Mixed { .. }));
        assert!(matches!(Layout::detect(&headings[1..2]), Layout::Mixed { .. }));
        assert!(matches!(Layout::detect(&headings[1..1]), Layout::LabelIndexed));
    }

    #[test]
    fn missing_district_heading() {
        let doc = Html::parse_document("<p>Nothing</p>");
        let err = locate_sections(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::StructuralMismatch { .. }));
    }

    #[test]
    fn label_layout_finds_category_tables() {
        let doc = Html::parse_document(
            r#"<h2>Assembly District 7</h2>
            <table><tr><td><strong>Executive Board</strong></td></tr></table>
            <table>
              <tr><td><strong>Self Identified Female</strong></td><td>Votes</td></tr>
              <tr><td>Alice</td><td>10</td></tr>
            </table>
            <table>
              <tr><td><strong>Other Than Self Identified Female</strong></td><td>Votes</td></tr>
              <tr><td>Bob</td><td>8</td></tr>
              <tr><td>Carl</td><td>3</td></tr>
            </table>"#,
        );
        let sections = locate_sections(&doc).unwrap();
        assert_eq!(sections.category_rows[0].len(), 2);
        assert_eq!(sections.category_rows[1].len(), 3);
        assert_eq!(
            single_string(sections.executive_board_cell),
            Some("Executive Board")
        );
    }

    #[test]
    fn missing_category_label() {
        let doc = Html::parse_document(
            r#"<h2>Assembly District 7</h2>
            <table><tr><td><strong>Executive Board</strong></td></tr></table>"#,
        );
        let err = locate_sections(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::StructuralMismatch { .. }));
    }
}
