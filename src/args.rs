use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for the tcxpack tool
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Working directory the source and output names are resolved against
    pub path: Option<PathBuf>,

    /// Path to an alternative config file
    pub config: Option<PathBuf>,

    /// Source directory override
    pub source: Option<String>,

    /// Output directory override
    pub output: Option<String>,

    /// Output file name override (without extension)
    pub name: Option<String>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(Self::command().get_matches())
    }

    fn command() -> Command {
        Command::new("tcxpack")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Packages a script project directory into a .tcx archive")
            .arg(
                Arg::new("path")
                    .short('p')
                    .long("path")
                    .value_name("DIR")
                    .help("Working directory (defaults to the current directory)")
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Path to a config file, relative to the current directory (defaults to tcxpack.toml in the working directory)")
            )
            .arg(
                Arg::new("source")
                    .short('s')
                    .long("source")
                    .value_name("DIR")
                    .help("Source directory to package")
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("DIR")
                    .help("Output directory (deleted and recreated on every run)")
            )
            .arg(
                Arg::new("name")
                    .short('n')
                    .long("name")
                    .value_name("NAME")
                    .help("Output file name without extension")
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose output")
            )
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            source: matches.get_one::<String>("source").cloned(),
            output: matches.get_one::<String>("output").cloned(),
            name: matches.get_one::<String>("name").cloned(),
        }
    }
}
