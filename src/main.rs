mod args;
mod report;

use clap::Parser;
use log::{error, info, LevelFilter};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::report::*;

/// Exit code bit set when the ballots could not be tallied.
const BALLOTS_FAILED: i32 = 1;
/// Exit code bit set when the posted results could not be extracted.
const POSTED_RESULTS_FAILED: i32 = 2;

fn report_error(context: &str, e: &ReportError) {
    error!("{}: {:?}", context, e);
    eprintln!("{}: {}", context, e);
    for cause in e.iter_chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

/// Runs both reports. Each failure sets its own bit in the exit code.
fn run_batch(settings: &Settings) -> i32 {
    let mut returncode = 0;

    match analyze_ballots(settings) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Failed to analyze ballots");
            returncode |= BALLOTS_FAILED;
        }
        Err(e) => {
            report_error("Failed to analyze ballots", &e);
            returncode |= BALLOTS_FAILED;
        }
    }

    match analyze_posted_results(settings) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Failed to analyze posted results");
            returncode |= POSTED_RESULTS_FAILED;
        }
        Err(e) => {
            report_error("Failed to analyze posted results", &e);
            returncode |= POSTED_RESULTS_FAILED;
        }
    }

    returncode
}

#[cfg(feature = "html")]
fn run_extract(
    output_mode: args::OutputMode,
    reference: Option<String>,
    paths: &[String],
) -> ReportResult<()> {
    use snafu::prelude::*;
    use std::io::Write;

    // Without a reference, the results go to the standard output as they come.
    let reference_path = match reference {
        None => {
            let stdout = std::io::stdout();
            posted::stream_paths(output_mode, paths, stdout.lock())?;
            return Ok(());
        }
        Some(p) => p,
    };

    let buffer = posted::stream_paths(output_mode, paths, Vec::new())?;
    let output = String::from_utf8_lossy(&buffer).to_string();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.as_bytes())
        .context(WritingOutputSnafu {})?;
    handle.flush().context(WritingOutputSnafu {})?;

    let expected = std::fs::read_to_string(&reference_path).context(OpeningFileSnafu {
        path: &reference_path,
    })?;
    info!("Comparing with reference {:?}", reference_path);
    if expected != output {
        log::warn!("Found differences with the reference output");
        text_diff::print_diff(expected.as_str(), output.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

#[cfg(not(feature = "html"))]
fn run_extract(
    _output_mode: args::OutputMode,
    _reference: Option<String>,
    _paths: &[String],
) -> ReportResult<()> {
    use snafu::prelude::*;
    HtmlSupportMissingSnafu {}.fail()
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    info!("args: {:?}", args);

    let settings = match config_reader::read_settings(args.config.clone()) {
        Ok(s) => s,
        Err(e) => {
            report_error("Failed to read settings", &e);
            std::process::exit(BALLOTS_FAILED | POSTED_RESULTS_FAILED);
        }
    };

    let returncode = match args.command {
        None => run_batch(&settings),
        Some(Command::Extract {
            output_mode,
            reference,
            paths,
        }) => match run_extract(output_mode, reference, &paths) {
            Ok(()) => 0,
            Err(e) => {
                report_error("Failed to extract results", &e);
                POSTED_RESULTS_FAILED
            }
        },
    };

    std::process::exit(returncode);
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Ballots in one district and one result page, both readable.
    fn sound_inputs(name: &str) -> (std::path::PathBuf, Settings) {
        let root = scratch_dir(name);
        let settings = Settings {
            ballots_directory: root.join("ballots").display().to_string(),
            posted_results_directory: root.join("posted-results").display().to_string(),
            output_directory: root.join("output").display().to_string(),
            ..Settings::default()
        };
        touch(
            &Path::new(&settings.ballots_directory)
                .join("AD 03")
                .join("AD 03 Valid Ballots"),
            &["CADEM_ABC_123456_03.pdf"],
        );
        let pages = Path::new(&settings.posted_results_directory);
        fs::create_dir_all(pages).unwrap();
        fs::write(
            pages.join("ad-3.html"),
            result_page(3, "<tr><td>Bob</td><td>30</td></tr>"),
        )
        .unwrap();
        (root, settings)
    }

    #[test]
    fn both_reports() {
        let (root, settings) = sound_inputs("batch-ok");
        assert_eq!(run_batch(&settings), 0);
        let output = Path::new(&settings.output_directory);
        assert!(output.join("report.txt").is_file());
        assert!(output.join("posted-results.csv").is_file());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn ballots_failure_only() {
        let (root, settings) = sound_inputs("batch-ballots");
        fs::remove_dir_all(&settings.ballots_directory).unwrap();
        fs::create_dir_all(&settings.ballots_directory).unwrap();
        assert_eq!(run_batch(&settings), BALLOTS_FAILED);
        assert!(Path::new(&settings.output_directory)
            .join("posted-results.csv")
            .is_file());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn posted_results_failure_only() {
        let (root, settings) = sound_inputs("batch-posted");
        fs::write(
            Path::new(&settings.posted_results_directory).join("ad-4.html"),
            result_page(4, "<tr><td>Carl</td><td>N/A</td></tr>"),
        )
        .unwrap();
        assert_eq!(run_batch(&settings), POSTED_RESULTS_FAILED);
        assert!(Path::new(&settings.output_directory)
            .join("report.txt")
            .is_file());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn both_failures() {
        let (root, settings) = sound_inputs("batch-both");
        fs::remove_dir_all(&settings.ballots_directory).unwrap();
        fs::remove_dir_all(&settings.posted_results_directory).unwrap();
        assert_eq!(run_batch(&settings), 3);
        fs::remove_dir_all(&root).unwrap();
    }
}
