// Inventory of the scanned ballots.
//
// The ballots of each district are in a directory "AD NN", split between the
// "AD NN Valid Ballots" and "AD NN Invalid Ballots" subdirectories.

use lazy_static::lazy_static;
use regex::Regex;

use crate::report::{io_common::*, *};

lazy_static! {
    static ref DISTRICT_DIR: Regex = Regex::new(r"^AD ([0-9]{2})$").unwrap();
    static ref BALLOT_FILE: Regex = Regex::new(r"^CADEM_.{3}_.{6}_([0-9]{2})\.pdf$").unwrap();
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotTally {
    /// The two-digit district code, as in the directory name.
    pub district: String,
    pub valid: u64,
    pub invalid: u64,
}

impl BallotTally {
    pub fn total(&self) -> u64 {
        self.valid + self.invalid
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OverallTally {
    pub districts: Vec<BallotTally>,
}

impl OverallTally {
    pub fn valid(&self) -> u64 {
        self.districts.iter().map(|d| d.valid).sum()
    }

    pub fn invalid(&self) -> u64 {
        self.districts.iter().map(|d| d.invalid).sum()
    }

    pub fn total(&self) -> u64 {
        self.valid() + self.invalid()
    }
}

/// Whether the file is a scanned ballot of the district: CADEM_???_??????_NN.pdf
fn is_ballot_file(file_name: &str, district: &str) -> bool {
    BALLOT_FILE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str() == district)
        .unwrap_or(false)
}

fn count_ballot_files(dir: &Path, district: &str) -> ReportResult<u64> {
    if !dir.is_dir() {
        warn!("Missing ballot directory {:?}, counting no ballots", dir);
        return Ok(0);
    }
    let mut count: u64 = 0;
    for entry in fs::read_dir(dir).context(ReadingDirectorySnafu { path: dir })? {
        let entry = entry.context(ReadingDirectorySnafu { path: dir })?;
        let name = entry.file_name();
        if name.to_str().map(|n| is_ballot_file(n, district)).unwrap_or(false) {
            count += 1;
        }
    }
    debug!("count_ballot_files: {:?}: {}", dir, count);
    Ok(count)
}

/// Counts the valid and invalid ballots of every district directory under the root.
///
/// Other subdirectories are ignored. The districts are sorted by directory name.
pub fn count_ballots(root: &Path) -> ReportResult<OverallTally> {
    ensure!(root.is_dir(), MissingBallotsDirSnafu { path: root });

    let mut district_dirs: Vec<(String, String)> = Vec::new();
    for entry in fs::read_dir(root).context(ReadingDirectorySnafu { path: root })? {
        let entry = entry.context(ReadingDirectorySnafu { path: root })?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match DISTRICT_DIR.captures(&name).and_then(|c| c.get(1)) {
            Some(m) => {
                let district = m.as_str().to_string();
                district_dirs.push((name, district));
            }
            None => {
                debug!("count_ballots: skipping directory {:?}", name);
            }
        }
    }
    district_dirs.sort();

    let mut res = OverallTally::default();
    for (dir_name, district) in district_dirs {
        let district_path = root.join(&dir_name);
        let valid = count_ballot_files(
            &district_path.join(format!("{} Valid Ballots", dir_name)),
            &district,
        )?;
        let invalid = count_ballot_files(
            &district_path.join(format!("{} Invalid Ballots", dir_name)),
            &district,
        )?;
        info!("AD-{}: {} valid, {} invalid ballots", district, valid, invalid);
        res.districts.push(BallotTally {
            district,
            valid,
            invalid,
        });
    }
    Ok(res)
}

/// Renders the tally report.
///
/// Every share must be defined: a district without any ballot fails the report.
pub fn render_report(tally: &OverallTally, requested: u64) -> ReportResult<String> {
    let total = tally.total();
    let mut lines: Vec<String> = vec![
        format!("Ballots requested: {}", with_thousands(requested)),
        format!(
            "Ballots received: {} ({} of requested)",
            with_thousands(total),
            percent(total, requested, "requested ballots")?
        ),
        format!(
            "Ballots determined to be valid: {} ({} of received)",
            with_thousands(tally.valid()),
            percent(tally.valid(), total, "received ballots")?
        ),
        format!(
            "Ballots determined to be invalid: {} ({} of received)",
            with_thousands(tally.invalid()),
            percent(tally.invalid(), total, "received ballots")?
        ),
    ];

    for d in tally.districts.iter() {
        let what = format!("received ballots in AD-{}", d.district);
        lines.push(String::new());
        lines.push(format!("## AD-{} breakdown", d.district));
        lines.push(String::new());
        lines.push(format!(
            "Ballots received: {} ({} of overall)",
            with_thousands(d.total()),
            percent(d.total(), total, "received ballots")?
        ));
        lines.push(format!(
            "Ballots determined to be valid: {} ({} of received)",
            with_thousands(d.valid),
            percent(d.valid, d.total(), &what)?
        ));
        lines.push(format!(
            "Ballots determined to be invalid: {} ({} of received)",
            with_thousands(d.invalid),
            percent(d.invalid, d.total(), &what)?
        ));
    }

    let mut res = lines.join("\n");
    res.push('\n');
    Ok(res)
}
