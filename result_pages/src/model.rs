// ********* Result data structures ***********

use snafu::Snafu;
use std::fmt::Display;

/// The two categories in which delegates are elected.
///
/// The set is closed: the ordering of the results depends on it.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    SelfIdentifiedFemale,
    OtherThanSelfIdentifiedFemale,
}

impl Category {
    /// All the categories, in priority order.
    pub const ALL: [Category; 2] = [
        Category::SelfIdentifiedFemale,
        Category::OtherThanSelfIdentifiedFemale,
    ];

    /// The short tag used in the reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::SelfIdentifiedFemale => "SIF",
            Category::OtherThanSelfIdentifiedFemale => "OSIF",
        }
    }

    /// The label printed in the result pages that do not use headings.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SelfIdentifiedFemale => "Self Identified Female",
            Category::OtherThanSelfIdentifiedFemale => "Other Than Self Identified Female",
        }
    }

    /// Position in the priority order. Winners of a lower rank are listed first.
    pub fn rank(&self) -> usize {
        match self {
            Category::SelfIdentifiedFemale => 0,
            Category::OtherThanSelfIdentifiedFemale => 1,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One row of a result table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateResult {
    pub name: String,
    pub category: Category,
    pub vote_count: u64,
    pub is_winner: bool,
}

/// Everything that can be recovered from the result page of one district.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DistrictExtraction {
    pub district_number: u32,
    /// The name found in the executive board cell, when the cell holds a single string.
    pub executive_board_winner: Option<String>,
    /// The candidates, in report order.
    pub results: Vec<CandidateResult>,
}

impl DistrictExtraction {
    pub fn is_executive_board_winner(&self, result: &CandidateResult) -> bool {
        self.executive_board_winner.as_deref() == Some(result.name.as_str())
    }
}

// ********* Errors **********

/// Errors that prevent a result page from being read.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ExtractError {
    #[snafu(display("Result page does not match any known layout: missing {what}"))]
    StructuralMismatch { what: String },

    #[snafu(display("Could not read vote count {text:?} in row {row}"))]
    VoteParse { text: Option<String>, row: String },

    #[snafu(display("Invalid selector {css:?}"))]
    InvalidSelector { css: String },
}

pub type ExtractResult<T> = Result<T, ExtractError>;
