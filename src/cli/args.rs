//! CLI argument definitions for `unirecords`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use uni_records::config::ConfigOverrides;
use uni_records::logger::Level;

/// CLI log level argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key (`level`, `file`, `verbose`, `snapshot`, `strict`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PrereqSubcommand {
    /// Make PREREQ a direct prerequisite of COURSE.
    Add {
        /// Dependent course
        #[arg(value_name = "COURSE")]
        course: String,
        /// Required course
        #[arg(value_name = "PREREQ")]
        prerequisite: String,
    },
    /// Remove a direct prerequisite edge.
    Remove {
        /// Dependent course
        #[arg(value_name = "COURSE")]
        course: String,
        /// Required course
        #[arg(value_name = "PREREQ")]
        prerequisite: String,
    },
    /// Report whether PREREQ is a direct or transitive prerequisite of COURSE.
    Check {
        /// Dependent course
        #[arg(value_name = "COURSE")]
        course: String,
        /// Candidate prerequisite
        #[arg(value_name = "PREREQ")]
        prerequisite: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    #[command(flatten)]
    Records(RecordCommand),
}

/// Subcommands that operate on the record snapshot
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Load the snapshot, re-validate it and print a summary.
    Check,
    /// Register a student for an offering.
    Register {
        /// Student user id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Offering id
        #[arg(value_name = "OFFERING")]
        offering: u32,
    },
    /// Withdraw a student from one of their enrollments.
    Drop {
        /// Student user id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Enrollment id
        #[arg(value_name = "ENROLLMENT")]
        enrollment: u32,
    },
    /// Record a grade as the offering's instructor.
    Grade {
        /// Faculty user id
        #[arg(value_name = "FACULTY")]
        faculty: String,
        /// Enrollment id
        #[arg(value_name = "ENROLLMENT")]
        enrollment: u32,
        /// Letter grade (A, A-, B+, B, B-, C+, C, C-, D+, D, F)
        #[arg(value_name = "GRADE")]
        grade: String,
    },
    /// Compute a student's credit-weighted GPA.
    Gpa {
        /// Student user id
        #[arg(value_name = "STUDENT")]
        student: String,
    },
    /// Edit or query the prerequisite graph.
    Prereq {
        #[command(subcommand)]
        subcommand: PrereqSubcommand,
    },
    /// Show seat usage of an offering.
    Seats {
        /// Offering id
        #[arg(value_name = "OFFERING")]
        offering: u32,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "unirecords",
    about = "University academic record consistency engine",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Record snapshot to operate on (overrides config `snapshot`)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Refuse unrecognized stored grades when computing GPA
    #[arg(long = "strict-gpa")]
    pub strict_gpa: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            snapshot: self
                .snapshot
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            strict: self.strict_gpa.then_some(true),
            ..ConfigOverrides::default()
        }
    }
}
