// Primitives for writing the combined CSV table of results.
//
// The table has no header. The columns are:
// source path, district number, name, category, vote count, won/lost, eboard marker.

use std::io::Write;

use csv::{Terminator, Writer, WriterBuilder};
use result_pages::DistrictExtraction;

use crate::report::*;

pub fn make_writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(out)
}

pub fn write_extraction<W: Write>(
    writer: &mut Writer<W>,
    source: &Path,
    extraction: &DistrictExtraction,
) -> ReportResult<()> {
    let source_path = source.display().to_string();
    let district = extraction.district_number.to_string();
    for r in extraction.results.iter() {
        let votes = r.vote_count.to_string();
        let record: [&str; 7] = [
            source_path.as_str(),
            district.as_str(),
            r.name.as_str(),
            r.category.tag(),
            votes.as_str(),
            if r.is_winner { "won" } else { "lost" },
            if extraction.is_executive_board_winner(r) {
                "eboard"
            } else {
                ""
            },
        ];
        writer.write_record(record).context(WritingCsvSnafu {})?;
    }
    Ok(())
}
