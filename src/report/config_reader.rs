use crate::report::*;

use serde::{Deserialize, Serialize};

/// The number of ballots requested by the voters.
pub const BALLOTS_REQUESTED: u64 = 169_743;

/// Where to find the inputs and write the reports.
///
/// All the locations are relative to the current directory unless absolute.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "ballotsDirectory")]
    pub ballots_directory: String,
    #[serde(rename = "postedResultsDirectory")]
    pub posted_results_directory: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: String,
    #[serde(rename = "ballotsRequested")]
    pub ballots_requested: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ballots_directory: "ballots".to_string(),
            posted_results_directory: "posted-results".to_string(),
            output_directory: "output".to_string(),
            ballots_requested: BALLOTS_REQUESTED,
        }
    }
}

pub fn read_settings(path: Option<String>) -> ReportResult<Settings> {
    let path = match path {
        Some(p) => p,
        None => return Ok(Settings::default()),
    };
    info!("Reading settings from {:?}", path);
    let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: &path })?;
    let settings: Settings =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_settings: {:?}", settings);
    Ok(settings)
}
