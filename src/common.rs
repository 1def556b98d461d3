/**
 * Definitions of data structures used by several modules, such as `DrillError` and the
 * various structs that hold command-line arguments.
 */
use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;


pub type Result<T> = ::std::result::Result<T, DrillError>;


#[derive(Debug, Error)]
pub enum DrillError {
    /// For when a bank file given on the command line does not exist.
    #[error("could not find question bank '{}'", .0.to_string_lossy())]
    BankNotFound(PathBuf),
    /// For when no bank files were given and none were found in the data directory.
    #[error("no question bank found (pass --bank or add week*.json files to {})", .0.to_string_lossy())]
    NoBank(PathBuf),
    /// For when the user asks for a question id that is not in the bank.
    #[error("could not find question with id '{0}'")]
    QuestionNotFound(String),
    #[error("could not parse JSON ({0})")]
    Json(#[from] serde_json::Error),
    #[error("database error ({0})")]
    Sql(#[from] rusqlite::Error),
    #[error("IO error ({0})")]
    Io(#[from] io::Error),
    #[error("invalid pattern ({0})")]
    Pattern(#[from] regex::Error),
    #[error("unable to create application directory '{}'", .0.to_string_lossy())]
    CannotMakeAppDir(PathBuf),
    #[error("")]
    ReadlineInterrupted,
    #[error("")]
    ReadlineEof,
    #[error("could not read input")]
    ReadlineOther,
}


/// Holds the command-line configuration for the application.
#[derive(Parser)]
#[command(name = "quizdrill", about = "Drill multiple-choice questions from the command line.")]
pub struct Options {
    /// A question bank file (JSON array). May be repeated; batches are concatenated in
    /// the order given.
    #[arg(short = 'b', long = "bank")]
    pub banks: Vec<PathBuf>,
    /// Keep application data in a particular directory.
    #[arg(short = 'd', long = "data-dir", env = "QUIZDRILL_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Directory containing `images/`. Defaults to the directory of the first bank file.
    #[arg(long = "assets")]
    pub assets: Option<PathBuf>,
    /// Do not emit colorized output.
    #[arg(long = "no-color")]
    pub no_color: bool,
    /// Keep solved questions in memory only, for this run.
    #[arg(long = "ephemeral")]
    pub ephemeral: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start an interactive drill.
    Take(TakeOptions),
    /// Walk through the whole bank starting at a particular question.
    Review(ReviewOptions),
    /// Report how many questions have been solved.
    Status,
    /// List the questions in the bank.
    List(ListOptions),
    /// Forget every solved question.
    Reset(ResetOptions),
    /// Print reference URLs derived from each question's source.
    Urls(UrlsOptions),
}

#[derive(Args, Default)]
pub struct TakeOptions {
    /// Ask the questions in random order.
    #[arg(long = "shuffle")]
    pub shuffle: bool,
    /// Leave out questions that have already been answered correctly.
    #[arg(long = "skip-solved")]
    pub skip_solved: bool,
    /// Do not render question images in the terminal.
    #[arg(long = "no-images")]
    pub no_images: bool,
}

#[derive(Args)]
pub struct ReviewOptions {
    /// The id of the question to start from.
    pub id: String,
    /// Do not render question images in the terminal.
    #[arg(long = "no-images")]
    pub no_images: bool,
}

#[derive(Args)]
pub struct ListOptions {
    /// Only list questions that have not been solved.
    #[arg(long = "unsolved")]
    pub unsolved: bool,
}

#[derive(Args)]
pub struct ResetOptions {
    /// Reset without prompting for confirmation.
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct UrlsOptions {
    /// Prefix for every generated path, e.g. https://example.com/s/kakomon/
    pub base_url: String,
}
