use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::catalog::SortKey;
use crate::courses::{Course, COURSES, PROGRAM_COURSES};
use crate::show::ShowId;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "movieverse", version, about = "Browse TV shows and keep a favorites list")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Write HTML pages into this directory instead of printing to the terminal.
    #[arg(long, global = true, value_name = "DIR")]
    pub site: Option<PathBuf>,
    /// Keep favorites in memory for this run only.
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse the catalog.
    Shows {
        #[arg(long)]
        genre: Option<String>,
        /// name, rating or premiered
        #[arg(long, default_value = "name")]
        sort: SortKey,
    },
    /// Show details for one catalog show.
    Show { id: ShowId },
    /// List favorites (no network).
    Favorites,
    /// Add or remove a favorite.
    Toggle { id: ShowId },
    /// Remove a favorite (no network).
    Remove { id: ShowId },
    /// Pick a featured show.
    Featured,
    /// List genres present in the catalog.
    Genres,
    /// Decode a contact form submission.
    FormResult {
        #[arg(default_value = "", allow_hyphen_values = true)]
        query: String,
    },
    /// Course list with credit total.
    Courses {
        /// Subject code, or `all`.
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, value_enum, default_value_t = CourseSet::Intro)]
        set: CourseSet,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSet {
    Intro,
    Program,
}

impl CourseSet {
    pub fn courses(self) -> &'static [Course] {
        match self {
            CourseSet::Intro => &COURSES,
            CourseSet::Program => &PROGRAM_COURSES,
        }
    }
}
