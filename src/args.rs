use clap::{Parser, Subcommand, ValueEnum};

/// Tallies the ballots received for the Assembly District elections and collects the
/// posted results of each district.
///
/// Without a subcommand, both reports are produced in the output directory.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the locations of the ballots, the posted
    /// results and the output directory. The default locations are relative to the
    /// current directory.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extracts the candidate results from Assembly District result pages.
    Extract {
        /// (default csv) Comma-separated values, or readable plain-text output.
        #[clap(long, value_enum, default_value = "csv")]
        output_mode: OutputMode,

        /// (file path) A reference output. If provided, the extracted results must match it.
        #[clap(short, long, value_parser)]
        reference: Option<String>,

        /// Result pages to process. Directories are searched for files named ad-<number>.html.
        #[clap(value_parser, required = true)]
        paths: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Csv,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verbose_help_names_standard_error() {
        let cmd = Args::command();
        let help = cmd
            .get_arguments()
            .find(|a| a.get_id() == "verbose")
            .and_then(|a| a.get_help())
            .unwrap();
        assert!(help.contains("standard error"));
    }

    #[test]
    fn extract_defaults_to_csv() {
        let args = Args::try_parse_from(["adresults", "extract", "--verbose", "posted-results"]).unwrap();
        assert!(args.verbose);
        match args.command {
            Some(Command::Extract {
                output_mode,
                reference,
                paths,
            }) => {
                assert_eq!(output_mode, OutputMode::Csv);
                assert_eq!(reference, None);
                assert_eq!(paths, vec!["posted-results".to_string()]);
            }
            None => panic!("no subcommand"),
        }
    }
}
