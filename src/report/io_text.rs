// Readable plain-text output: one block per district.

use std::io::Write;

use result_pages::DistrictExtraction;

use crate::report::*;

/// Writes the district label, the number of candidates, then one line per candidate.
/// Elected candidates are marked with a star.
pub fn write_extraction<W: Write>(out: &mut W, extraction: &DistrictExtraction) -> ReportResult<()> {
    writeln!(out, "AD-{}", extraction.district_number).context(WritingOutputSnafu {})?;
    writeln!(out).context(WritingOutputSnafu {})?;
    writeln!(out, "{} candidates", extraction.results.len()).context(WritingOutputSnafu {})?;
    for r in extraction.results.iter() {
        writeln!(
            out,
            "{}{}\t{}\t{}",
            if r.is_winner { "*" } else { "" },
            r.name,
            r.category,
            r.vote_count
        )
        .context(WritingOutputSnafu {})?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use result_pages::{CandidateResult, Category};

    #[test]
    fn block() {
        let extraction = DistrictExtraction {
            district_number: 12,
            executive_board_winner: None,
            results: vec![
                CandidateResult {
                    name: "Jane Doe".to_string(),
                    category: Category::SelfIdentifiedFemale,
                    vote_count: 500,
                    is_winner: true,
                },
                CandidateResult {
                    name: "John Roe".to_string(),
                    category: Category::OtherThanSelfIdentifiedFemale,
                    vote_count: 12,
                    is_winner: false,
                },
            ],
        };
        let mut out: Vec<u8> = Vec::new();
        write_extraction(&mut out, &extraction).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "AD-12\n\n2 candidates\n*Jane Doe\tSIF\t500\nJohn Roe\tOSIF\t12\n"
        );
    }
}
