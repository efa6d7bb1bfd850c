use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for rfichaje
/// CLI time clock: punch entry, exit and pauses using SQLite
#[derive(Parser)]
#[command(
    name = "rfichaje",
    version = env!("CARGO_PKG_VERSION"),
    about = "A time clock CLI: punch entry, exit and pauses, export reports, and watch for forgotten exits",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this subject instead of the configured one
    #[arg(global = true, long = "subject")]
    pub subject: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Add missing keys with their default values")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $VISUAL, $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record a punch: entry, exit, pause-start or pause-end
    Punch {
        /// entry | exit | pause-start | pause-end
        action: String,

        #[arg(long = "lat", allow_hyphen_values = true, help = "Latitude of the punch")]
        latitude: Option<String>,

        #[arg(long = "lon", allow_hyphen_values = true, help = "Longitude of the punch")]
        longitude: Option<String>,
    },

    /// Show the current status and punch history
    Status {
        #[arg(long = "from", value_name = "YYYY-MM-DD", requires = "to")]
        from: Option<String>,

        #[arg(long = "to", value_name = "YYYY-MM-DD", requires = "from")]
        to: Option<String>,

        #[arg(long = "limit", help = "Number of recent punches when no range is given")]
        limit: Option<usize>,

        #[arg(long = "json", help = "Print the status as JSON")]
        json: bool,
    },

    /// Export punches to CSV or JSON
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(
            long,
            value_name = "FILE",
            help = "Output file (default: timeclock_report_<YYYYMMDD>.<ext>)"
        )]
        file: Option<String>,

        #[arg(long = "from", value_name = "YYYY-MM-DD", requires = "to")]
        from: Option<String>,

        #[arg(long = "to", value_name = "YYYY-MM-DD", requires = "from")]
        to: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run one forgotten-exit check and print the result
    Sweep,

    /// Keep checking for forgotten exits in the foreground (type `q` to stop)
    Watch {
        #[arg(
            long = "cycles",
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Stop after this many checks"
        )]
        cycles: Option<u64>,
    },
}
