/**
 * The session engine: a state machine that selects the questions for a session, moves
 * through them, and keeps score.
 *
 * Idle    --start-->        Playing   (rejected when no questions are left)
 * Idle    --review(id)-->   Playing   (whole bank, starting at `id`)
 * Playing --select/jump-->  Playing
 * Playing --advance-->      Playing, or Result after the last question
 * Result  --start-->        Playing
 * Result  --go home-->      Idle
 *
 * Answering a question correctly is the only transition with a side effect: the
 * question is added to the solved set, which is written through to storage.
 */
use std::mem;

use rand::Rng;

use super::bank::{Bank, Question};
use super::common::Result;
use super::persistence::Storage;
use super::shuffle::shuffled;
use super::solved::SolvedSet;


/// User-selectable settings that apply to the next session started.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub shuffle: bool,
    pub skip_solved: bool,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Started with `start`: filtered and shuffled according to the config.
    Drill,
    /// Started with `review`: the whole bank in order, from a chosen question.
    Review,
}


/// One run through a list of questions.
#[derive(Debug, Clone)]
pub struct Session<'b> {
    questions: Vec<&'b Question>,
    current_index: usize,
    selected: Option<usize>,
    is_correct: Option<bool>,
    score: usize,
    mode: SessionMode,
}


impl<'b> Session<'b> {
    fn new(questions: Vec<&'b Question>, current_index: usize, mode: SessionMode) -> Self {
        Session {
            questions,
            current_index,
            selected: None,
            is_correct: None,
            score: 0,
            mode,
        }
    }

    pub fn questions(&self) -> &[&'b Question] {
        &self.questions
    }

    pub fn current(&self) -> &'b Question {
        self.questions[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Percentage of the session's questions answered correctly, rounded to the
    /// nearest integer.
    pub fn accuracy(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        ((self.score as f64 / self.questions.len() as f64) * 100.0).round() as u32
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.is_correct = None;
    }
}


#[derive(Debug, Clone)]
pub enum GameState<'b> {
    Idle,
    Playing(Session<'b>),
    Result(Session<'b>),
}


/// A user command forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Review(String),
    Select(usize),
    Advance,
    Jump(usize),
    ResetHistory,
    ToggleShuffle(bool),
    ToggleSkipSolved(bool),
    GoHome,
}


/// What applying an intent did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The intent was not valid in the current state, or named an unknown target.
    Ignored,
    /// `start` found no questions to ask; the engine is still in its previous state.
    EmptySelection,
}


/// One row of the question map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry<'b> {
    pub index: usize,
    pub id: &'b str,
    pub solved: bool,
    pub current: bool,
}


pub struct Engine<'b, S: Storage, R: Rng> {
    bank: &'b Bank,
    solved: SolvedSet<S>,
    config: Config,
    rng: R,
    state: GameState<'b>,
}


impl<'b, S: Storage, R: Rng> Engine<'b, S, R> {
    pub fn new(bank: &'b Bank, solved: SolvedSet<S>, config: Config, rng: R) -> Self {
        Engine { bank, solved, config, rng, state: GameState::Idle }
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Outcome> {
        log::debug!("applying {:?}", intent);
        let state = mem::replace(&mut self.state, GameState::Idle);
        let (next, outcome) = self.transition(state, intent);
        self.state = next;
        outcome
    }

    fn transition(
        &mut self, state: GameState<'b>, intent: Intent
    ) -> (GameState<'b>, Result<Outcome>) {
        match (state, intent) {
            (state, Intent::ToggleShuffle(on)) => {
                self.config.shuffle = on;
                (state, Ok(Outcome::Applied))
            },
            (state, Intent::ToggleSkipSolved(on)) => {
                self.config.skip_solved = on;
                (state, Ok(Outcome::Applied))
            },
            (state @ GameState::Idle, Intent::Start)
            | (state @ GameState::Result(_), Intent::Start) => {
                let questions = self.active_questions();
                if questions.is_empty() {
                    log::debug!("start rejected: no questions selected");
                    (state, Ok(Outcome::EmptySelection))
                } else {
                    let session = Session::new(questions, 0, SessionMode::Drill);
                    (GameState::Playing(session), Ok(Outcome::Applied))
                }
            },
            (GameState::Idle, Intent::Review(id)) => {
                match self.bank.position(&id) {
                    Some(index) => {
                        let questions = self.bank.iter().collect();
                        let session = Session::new(questions, index, SessionMode::Review);
                        (GameState::Playing(session), Ok(Outcome::Applied))
                    },
                    None => (GameState::Idle, Ok(Outcome::Ignored)),
                }
            },
            (GameState::Playing(session), Intent::Select(option)) => {
                self.select(session, option)
            },
            (GameState::Playing(mut session), Intent::Advance) => {
                if session.selected.is_none() {
                    (GameState::Playing(session), Ok(Outcome::Ignored))
                } else if session.is_last() {
                    (GameState::Result(session), Ok(Outcome::Applied))
                } else {
                    session.current_index += 1;
                    session.clear_selection();
                    (GameState::Playing(session), Ok(Outcome::Applied))
                }
            },
            (GameState::Playing(mut session), Intent::Jump(index)) => {
                if index < session.len() {
                    session.current_index = index;
                    session.clear_selection();
                    (GameState::Playing(session), Ok(Outcome::Applied))
                } else {
                    (GameState::Playing(session), Ok(Outcome::Ignored))
                }
            },
            (GameState::Playing(_), Intent::GoHome) | (GameState::Result(_), Intent::GoHome) => {
                (GameState::Idle, Ok(Outcome::Applied))
            },
            (GameState::Idle, Intent::ResetHistory) => {
                match self.solved.clear() {
                    Ok(()) => (GameState::Idle, Ok(Outcome::Applied)),
                    Err(e) => (GameState::Idle, Err(e)),
                }
            },
            (state, _) => (state, Ok(Outcome::Ignored)),
        }
    }

    fn select(
        &mut self, mut session: Session<'b>, option: usize
    ) -> (GameState<'b>, Result<Outcome>) {
        let question = session.current();
        if session.selected.is_some() || option >= question.options.len() {
            return (GameState::Playing(session), Ok(Outcome::Ignored));
        }

        let correct = question.is_correct(option);
        session.selected = Some(option);
        session.is_correct = Some(correct);

        let mut outcome = Ok(Outcome::Applied);
        if correct {
            session.score += 1;
            if let Err(e) = self.solved.mark_solved(&question.id) {
                outcome = Err(e);
            }
        }
        (GameState::Playing(session), outcome)
    }

    /// The bank, minus solved questions if `skip_solved` is set, shuffled if `shuffle`
    /// is set.
    fn active_questions(&mut self) -> Vec<&'b Question> {
        let bank: &'b Bank = self.bank;
        let skip_solved = self.config.skip_solved;
        let solved = &self.solved;
        let filtered: Vec<&'b Question> = bank
            .iter()
            .filter(|q| !(skip_solved && solved.contains(&q.id)))
            .collect();

        if self.config.shuffle {
            shuffled(&filtered, &mut self.rng)
        } else {
            filtered
        }
    }

    pub fn state(&self) -> &GameState<'b> {
        &self.state
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn bank(&self) -> &'b Bank {
        self.bank
    }

    pub fn solved(&self) -> &SolvedSet<S> {
        &self.solved
    }

    pub fn is_solved(&self, id: &str) -> bool {
        self.solved.contains(id)
    }

    /// Number of questions in the bank that have been solved.
    pub fn solved_count(&self) -> usize {
        self.bank.iter().filter(|q| self.solved.contains(&q.id)).count()
    }

    /// The active questions of the current session with their solved marks, or an
    /// empty list outside of a session.
    pub fn question_map(&self) -> Vec<MapEntry<'b>> {
        let session = match &self.state {
            GameState::Playing(session) | GameState::Result(session) => session,
            GameState::Idle => return Vec::new(),
        };

        session.questions.iter().enumerate().map(|(index, q)| {
            MapEntry {
                index,
                id: q.id.as_str(),
                solved: self.solved.contains(&q.id),
                current: index == session.current_index,
            }
        }).collect()
    }
}
