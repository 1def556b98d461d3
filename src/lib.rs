/**
 * Implementation of the quizdrill application: drill multiple-choice questions from a
 * static bank and remember which ones have been answered correctly.
 */
#[macro_use]
pub mod iohelper;
pub mod bank;
pub mod common;
pub mod image;
pub mod persistence;
pub mod session;
pub mod shell;
pub mod shuffle;
pub mod solved;
pub mod sources;

pub use bank::{Bank, Question};
pub use common::{DrillError, Result};
pub use session::{Config, Engine, GameState, Intent, Outcome, Session, SessionMode};
pub use solved::SolvedSet;
