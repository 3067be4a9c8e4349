use log::{debug, info, warn};
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

pub mod ballots;
pub mod config_reader;
pub mod io_common;
#[cfg(feature = "html")]
pub mod io_csv;
#[cfg(feature = "html")]
pub mod io_text;
#[cfg(feature = "html")]
pub mod posted;

pub use crate::report::config_reader::Settings;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("Error reading directory {path:?}"))]
    ReadingDirectory {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Ballots directory {path:?} does not exist"))]
    MissingBallotsDir { path: PathBuf },
    #[snafu(display("Error reading file {path:?}"))]
    OpeningFile {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error writing file {path:?}"))]
    WritingFile {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error writing the output"))]
    WritingOutput { source: std::io::Error },
    #[snafu(display("Error writing CSV output"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error parsing settings file {path:?}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("No ballots to compute the share of {what}"))]
    EmptyDenominator { what: String },
    #[snafu(display("Error extracting results from {path:?}"))]
    Extraction {
        source: PageError,
        path: PathBuf,
    },
    #[snafu(display("Reading result pages is not available: built without the html feature"))]
    HtmlSupportMissing {},
    #[snafu(display("Difference detected between the extracted results and reference {path:?}"))]
    ReferenceMismatch { path: String },
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(feature = "html")]
pub type PageError = result_pages::ExtractError;
#[cfg(not(feature = "html"))]
pub type PageError = std::convert::Infallible;

/// Creates the output directory if it does not exist yet.
pub fn ensure_dir(path: &Path) -> ReportResult<()> {
    debug!("ensure_dir: {:?}", path);
    fs::create_dir_all(path).context(WritingFileSnafu { path })
}

/// Counts the ballots and writes the tally report.
///
/// Returns false if no ballot was found at all.
pub fn analyze_ballots(settings: &Settings) -> ReportResult<bool> {
    let tally = ballots::count_ballots(Path::new(&settings.ballots_directory))?;
    info!(
        "Found {} ballots in {} districts",
        tally.total(),
        tally.districts.len()
    );
    if tally.total() == 0 {
        warn!("No ballots found in {:?}", settings.ballots_directory);
        return Ok(false);
    }

    let report = ballots::render_report(&tally, settings.ballots_requested)?;

    let output_dir = Path::new(&settings.output_directory);
    ensure_dir(output_dir)?;
    let report_path = output_dir.join("report.txt");
    fs::write(&report_path, report).context(WritingFileSnafu { path: &report_path })?;
    info!("Wrote ballot report to {:?}", report_path);
    Ok(true)
}

/// Extracts all the posted result pages into a single CSV table.
#[cfg(feature = "html")]
pub fn analyze_posted_results(settings: &Settings) -> ReportResult<bool> {
    let output_dir = Path::new(&settings.output_directory);
    ensure_dir(output_dir)?;
    let output_path = output_dir.join("posted-results.csv");
    let file = fs::File::create(&output_path).context(WritingFileSnafu { path: &output_path })?;

    let mut sink = posted::ResultSink::new(crate::args::OutputMode::Csv, file);
    posted::ingest_tree(Path::new(&settings.posted_results_directory), &mut sink)?;
    sink.finish()?;
    info!("Wrote posted results to {:?}", output_path);
    Ok(true)
}

#[cfg(not(feature = "html"))]
pub fn analyze_posted_results(_settings: &Settings) -> ReportResult<bool> {
    HtmlSupportMissingSnafu {}.fail()
}

/// A fresh directory for the files of one test.
#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!("adresults-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// Creates empty files in the directory, creating it first.
#[cfg(test)]
pub(crate) fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for n in names {
        fs::write(dir.join(n), b"%PDF").unwrap();
    }
}

/// A result page with headings for every section. The rows go in the second category.
#[cfg(test)]
pub(crate) fn result_page(district: u32, rows: &str) -> String {
    format!(
        r#"<html><body>
        <div><h2>Assembly District {district}</h2></div>
        <div><h2>Executive Board</h2>
          <table><tr><td>Winner</td><td>Jane Doe</td></tr></table></div>
        <div><h2>Self Identified Female</h2>
          <table><tr><td>Name</td><td>SUM of Vote</td></tr>
          <tr><td><strong>Jane Doe</strong></td><td>120</td></tr></table></div>
        <div><h2>Other Than Self Identified Female</h2>
          <table><tr><td>Name</td><td>SUM of Vote</td></tr>
          {rows}</table></div>
        </body></html>"#,
        district = district,
        rows = rows
    )
}
