//! Command-line flags
//!
//! Every flag maps onto one field of the topmost configuration layer; an
//! absent flag leaves the value from file, environment or defaults in place.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cryptodash_core::ConfigOverrides;

/// Parsed invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cli {
    /// Explicit config file replacing the global one.
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

pub fn build_cli() -> Command {
    Command::new("cryptodash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live terminal dashboard of ranked cryptocurrency market data")
        .long_about(
            "Shows the top coins by market cap in a sortable, auto-refreshing table.\n\
             \n\
             SETTINGS (later overrides earlier):\n  \
             1. Built-in defaults\n  \
             2. ~/.config/cryptodash/config.toml, or the file given with --config\n  \
             3. CRYPTODASH_COLOR, CRYPTODASH_LIMIT, CRYPTODASH_REFRESH,\n     \
             CRYPTODASH_API_URL, CRYPTODASH_GLOBAL, CRYPTODASH_GLOBAL_API_URL,\n     \
             CRYPTODASH_LOG_FILE\n  \
             4. The flags below\n\
             \n\
             Press h or ? inside the dashboard for key bindings.",
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_name("NAME")
                .help("Primary colour: green, cyan, magenta, white, red, yellow"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('l')
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Number of coins to fetch (1-2000, default 100)"),
        )
        .arg(
            Arg::new("refresh")
                .long("refresh")
                .short('r')
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("Seconds between background refreshes (0 means 60)"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Ticker endpoint returning a JSON array of coins"),
        )
        .arg(
            Arg::new("global")
                .long("global")
                .short('g')
                .action(ArgAction::SetTrue)
                .help("Show the global market summary above the table (M toggles it)"),
        )
        .arg(
            Arg::new("global-api-url")
                .long("global-api-url")
                .value_name("URL")
                .help("Endpoint returning global market totals"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Read settings from this file instead of the global config"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Write logs to this file (RUST_LOG sets the level)"),
        )
}

impl Cli {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            overrides: ConfigOverrides {
                color: matches.get_one::<String>("color").cloned(),
                limit: matches.get_one::<u32>("limit").copied(),
                refresh_interval_secs: matches.get_one::<u64>("refresh").copied(),
                api_url: matches.get_one::<String>("api-url").cloned(),
                global: matches.get_flag("global").then_some(true),
                global_api_url: matches.get_one::<String>("global-api-url").cloned(),
                log_file: matches.get_one::<PathBuf>("log-file").cloned(),
            },
        }
    }

    /// Parse the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&build_cli().get_matches())
    }
}
