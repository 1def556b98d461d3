/**
 * The interactive command-line interface: renders the engine's state and turns what
 * the user types into intents.
 */
use std::io;
use std::io::Write;
use std::path::PathBuf;

use colored::*;
use rand::Rng;
use unicode_normalization::UnicodeNormalization;

use super::bank::{Bank, Question};
use super::common::Result;
use super::image;
use super::iohelper::{confirm, prettyprint, prettyprint_colored, prompt, LineReader};
use super::persistence::Storage;
use super::session::{Engine, GameState, Intent, Outcome, SessionMode};
use super::solved::SolvedSet;


const EMPTY_SELECTION_NOTICE: &str =
    "All questions have been solved. Turn off skip-solved or reset your history.";

const IDLE_HELP: &str =
    "Commands: start, shuffle on|off, skip on|off, review <id>, list, reset, quit";

const PLAYING_HELP: &str =
    "Answer with a letter (a-d). Enter moves on after answering. Other commands: \
     map, go <n>, home";


/// Presentation settings that do not affect the engine.
pub struct ShellOptions {
    pub show_images: bool,
    /// Directory containing the `images/` directory.
    pub asset_root: PathBuf,
}


enum Screen {
    Idle,
    Playing,
    Result,
}


enum Flow {
    Continue,
    Quit,
}


/// Run the interactive loop until the user quits.
pub fn run<W, R, S, G>(
    engine: &mut Engine<'_, S, G>, writer: &mut W, reader: &mut R, options: &ShellOptions
) -> Result<()>
where
    W: io::Write,
    R: LineReader,
    S: Storage,
    G: Rng,
{
    loop {
        let screen = match engine.state() {
            GameState::Idle => Screen::Idle,
            GameState::Playing(_) => Screen::Playing,
            GameState::Result(_) => Screen::Result,
        };

        let flow = match screen {
            Screen::Idle => idle(engine, writer, reader)?,
            Screen::Playing => playing(engine, writer, reader, options)?,
            Screen::Result => result(engine, writer, reader)?,
        };

        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}


fn idle<W, R, S, G>(engine: &mut Engine<'_, S, G>, writer: &mut W, reader: &mut R) -> Result<Flow>
where
    W: io::Write,
    R: LineReader,
    S: Storage,
    G: Rng,
{
    my_write!(writer, "\n")?;
    print_status(engine.bank(), engine.solved(), writer)?;
    print_config(engine, writer)?;
    prettyprint_colored(writer, IDLE_HELP, Some("  "), Some(Color::BrightBlue), None)?;
    my_write!(writer, "\n")?;

    loop {
        let response = match prompt(reader, "> ")? {
            Some(response) => normalize(&response),
            None => return Ok(Flow::Quit),
        };
        let (command, argument) = split_command(&response);

        match command.as_str() {
            "" => {},
            "q" | "quit" | "exit" => {
                return Ok(Flow::Quit);
            },
            "s" | "start" => {
                if let Outcome::EmptySelection = engine.apply(Intent::Start)? {
                    warning(writer, EMPTY_SELECTION_NOTICE)?;
                } else {
                    return Ok(Flow::Continue);
                }
            },
            "shuffle" => {
                match parse_switch(argument) {
                    Some(on) => {
                        engine.apply(Intent::ToggleShuffle(on))?;
                        print_config(engine, writer)?;
                    },
                    None => {
                        my_writeln!(writer, "Usage: shuffle on|off")?;
                    }
                }
            },
            "skip" => {
                match parse_switch(argument) {
                    Some(on) => {
                        engine.apply(Intent::ToggleSkipSolved(on))?;
                        print_config(engine, writer)?;
                    },
                    None => {
                        my_writeln!(writer, "Usage: skip on|off")?;
                    }
                }
            },
            "r" | "review" => {
                if argument.is_empty() {
                    my_writeln!(writer, "Usage: review <id>")?;
                } else if engine.apply(Intent::Review(argument.to_string()))? == Outcome::Applied {
                    return Ok(Flow::Continue);
                } else {
                    my_writeln!(writer, "No question with id '{}'.", argument)?;
                }
            },
            "l" | "list" => {
                print_list(engine.bank(), engine.solved(), writer, false)?;
            },
            "reset" => {
                let count = engine.solved_count();
                let message = format!("Forget all {} solved question(s)? ", count);
                if confirm(reader, &message)? {
                    engine.apply(Intent::ResetHistory)?;
                    my_writeln!(writer, "History cleared.")?;
                    print_status(engine.bank(), engine.solved(), writer)?;
                }
            },
            "h" | "help" | "?" => {
                prettyprint(writer, IDLE_HELP, Some("  "))?;
            },
            _ => {
                my_writeln!(writer, "Unknown command '{}'. Type 'help' for a list.", command)?;
            }
        }
    }
}


fn playing<W, R, S, G>(
    engine: &mut Engine<'_, S, G>, writer: &mut W, reader: &mut R, options: &ShellOptions
) -> Result<Flow>
where
    W: io::Write,
    R: LineReader,
    S: Storage,
    G: Rng,
{
    render_question(engine, writer, options)?;

    loop {
        let (question, selected, is_last) = match engine.state() {
            GameState::Playing(session) => {
                (session.current(), session.selected(), session.is_last())
            },
            _ => return Ok(Flow::Continue),
        };

        let message = match (selected, is_last) {
            (None, _) => "> ",
            (Some(_), false) => "[Enter] next > ",
            (Some(_), true) => "[Enter] finish > ",
        };
        let response = match prompt(reader, message)? {
            Some(response) => normalize(&response),
            None => {
                engine.apply(Intent::GoHome)?;
                return Ok(Flow::Continue);
            }
        };
        let (command, argument) = split_command(&response);

        match command.as_str() {
            "" | "n" | "next" => {
                if selected.is_some() {
                    engine.apply(Intent::Advance)?;
                    return Ok(Flow::Continue);
                } else {
                    my_writeln!(writer, "Please enter a letter.")?;
                }
            },
            "m" | "map" => {
                print_map(engine, writer)?;
            },
            "g" | "go" => {
                let target = argument.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                let outcome = match target {
                    Some(index) => engine.apply(Intent::Jump(index))?,
                    None => Outcome::Ignored,
                };
                if outcome == Outcome::Applied {
                    return Ok(Flow::Continue);
                }
                my_writeln!(writer, "No question number '{}'.", argument)?;
            },
            "home" => {
                engine.apply(Intent::GoHome)?;
                return Ok(Flow::Continue);
            },
            "h" | "help" | "?" => {
                prettyprint(writer, PLAYING_HELP, Some("  "))?;
            },
            _ => {
                if selected.is_some() {
                    my_writeln!(writer, "You already answered this question.")?;
                    continue;
                }

                let outcome = match parse_choice(&response) {
                    Some(index) => engine.apply(Intent::Select(index))?,
                    None => Outcome::Ignored,
                };
                if outcome == Outcome::Applied {
                    feedback(engine, question, writer)?;
                } else {
                    my_writeln!(writer, "Please enter a letter.")?;
                }
            }
        }
    }
}


fn result<W, R, S, G>(engine: &mut Engine<'_, S, G>, writer: &mut W, reader: &mut R) -> Result<Flow>
where
    W: io::Write,
    R: LineReader,
    S: Storage,
    G: Rng,
{
    if let GameState::Result(session) = engine.state() {
        my_write!(writer, "\n\n")?;
        match session.mode() {
            SessionMode::Drill => {
                let score_as_str = format!("{}%", session.accuracy());
                my_write!(writer, "Score: ")?;
                my_write!(writer, "{}", score_as_str.cyan())?;
                my_write!(writer, " out of ")?;
                my_write!(writer, "{}", format!("{}", session.len()).cyan())?;
                if session.len() == 1 {
                    my_writeln!(writer, " question")?;
                } else {
                    my_writeln!(writer, " questions")?;
                }
                my_write!(writer, "  {}", format!("{}", session.score()).green())?;
                my_write!(writer, " correct\n")?;
                my_write!(writer, "  {}", format!("{}", session.len().saturating_sub(session.score())).red())?;
                my_write!(writer, " incorrect\n")?;
            },
            SessionMode::Review => {
                my_writeln!(
                    writer,
                    "Review finished: {} answered correctly.",
                    format!("{}", session.score()).green()
                )?;
            },
        }
        my_write!(writer, "\n")?;
    }

    loop {
        let response = match prompt(reader, "[a]gain, [h]ome or [q]uit > ")? {
            Some(response) => normalize(&response),
            None => return Ok(Flow::Quit),
        };
        let (command, _) = split_command(&response);

        match command.as_str() {
            "a" | "again" | "start" => {
                if let Outcome::EmptySelection = engine.apply(Intent::Start)? {
                    warning(writer, EMPTY_SELECTION_NOTICE)?;
                } else {
                    return Ok(Flow::Continue);
                }
            },
            "" | "h" | "home" => {
                engine.apply(Intent::GoHome)?;
                return Ok(Flow::Continue);
            },
            "q" | "quit" | "exit" => {
                return Ok(Flow::Quit);
            },
            _ => {
                my_writeln!(writer, "Please enter 'again', 'home' or 'quit'.")?;
            }
        }
    }
}


fn render_question<W, S, G>(
    engine: &Engine<'_, S, G>, writer: &mut W, options: &ShellOptions
) -> Result<()>
where
    W: io::Write,
    S: Storage,
    G: Rng,
{
    let session = match engine.state() {
        GameState::Playing(session) => session,
        _ => return Ok(()),
    };
    let question = session.current();
    let number = session.current_index() + 1;

    my_write!(writer, "\n")?;
    let solved_mark = if engine.is_solved(&question.id) { "  (solved)" } else { "" };
    my_writeln!(
        writer,
        "  [{}]  Question {} / {}{}",
        question.id.cyan(),
        number,
        session.len(),
        solved_mark.green(),
    )?;
    if !question.source.is_empty() {
        prettyprint_colored(writer, &question.source, Some("  "), Some(Color::BrightBlack), None)?;
    }
    my_write!(writer, "\n")?;

    let prefix = format!("  ({}) ", number);
    prettyprint_colored(writer, &question.question, Some(&prefix), None, Some(Color::Cyan))?;

    if let Some(statements) = &question.statements {
        my_write!(writer, "\n")?;
        let indent = " ".repeat(prefix.len());
        for statement in statements.iter() {
            prettyprint(writer, statement, Some(&indent))?;
        }
    }

    if let Some(path) = question.image_path(&options.asset_root) {
        my_write!(writer, "\n")?;
        if !options.show_images {
            my_writeln!(writer, "     (image: {})", path.display())?;
        } else if !image::render(writer, &path) {
            warning(writer, &format!("image not available: {}", path.display()))?;
        }
    }

    my_write!(writer, "\n")?;
    for (i, option) in question.options.iter().enumerate() {
        let prefix = format!("     ({}) ", label(i));
        prettyprint(writer, option, Some(&prefix))?;
    }
    my_write!(writer, "\n")
}


fn feedback<W: io::Write, S: Storage, G: Rng>(
    engine: &Engine<'_, S, G>, question: &Question, writer: &mut W
) -> Result<()> {
    let is_correct = match engine.state() {
        GameState::Playing(session) => session.is_correct(),
        _ => None,
    };

    if is_correct == Some(true) {
        prettyprint(writer, &format!("{}", "Correct!".green()), None)?;
    } else {
        let correction = question.answer_index()
            .and_then(|i| question.options.get(i).map(|option| (i, option)));
        if let Some((i, option)) = correction {
            let message = format!(
                "{} The correct answer was {}.",
                "Incorrect.".red(),
                format!("({}) {}", label(i), option).green(),
            );
            prettyprint(writer, &message, None)?;
        } else {
            prettyprint(writer, &format!("{}", "Incorrect.".red()), None)?;
        }
    }

    if let Some(explanation) = &question.explanation {
        my_write!(writer, "\n")?;
        prettyprint_colored(writer, explanation, Some("  "), Some(Color::BrightBlue), None)?;
    }
    my_write!(writer, "\n")
}


/// Print the number of questions and how many of them have been solved.
pub fn print_status<W: io::Write, S: Storage>(
    bank: &Bank, solved: &SolvedSet<S>, writer: &mut W
) -> Result<()> {
    let count = bank.iter().filter(|q| solved.contains(&q.id)).count();
    my_write!(writer, "{}", format!("{}", bank.len()).cyan())?;
    if bank.len() == 1 {
        my_write!(writer, " question, ")?;
    } else {
        my_write!(writer, " questions, ")?;
    }
    my_writeln!(writer, "{} solved", format!("{}", count).green())
}


/// Print every question in the bank with a mark beside the solved ones.
pub fn print_list<W: io::Write, S: Storage>(
    bank: &Bank, solved: &SolvedSet<S>, writer: &mut W, unsolved_only: bool
) -> Result<()> {
    let width = bank.iter().map(|q| q.id.chars().count()).max().unwrap_or(0);
    for question in bank.iter() {
        let is_solved = solved.contains(&question.id);
        if unsolved_only && is_solved {
            continue;
        }
        let mark = if is_solved { "✓" } else { " " };
        let prefix = format!("  {} {:<width$}  ", mark, question.id, width = width);
        prettyprint(writer, &question.question, Some(&prefix))?;
    }
    Ok(())
}


fn print_map<W: io::Write, S: Storage, G: Rng>(
    engine: &Engine<'_, S, G>, writer: &mut W
) -> Result<()> {
    for entry in engine.question_map() {
        let pointer = if entry.current { ">" } else { " " };
        let mark = if entry.solved { "✓" } else { " " };
        my_writeln!(writer, "  {} {:>3}  {} {}", pointer, entry.index + 1, mark.green(), entry.id)?;
    }
    Ok(())
}


fn print_config<W: io::Write, S: Storage, G: Rng>(
    engine: &Engine<'_, S, G>, writer: &mut W
) -> Result<()> {
    let config = engine.config();
    my_writeln!(
        writer,
        "shuffle: {}, skip solved: {}",
        on_off(config.shuffle).cyan(),
        on_off(config.skip_solved).cyan(),
    )
}


fn warning<W: io::Write>(writer: &mut W, text: &str) -> Result<()> {
    prettyprint_colored(writer, &format!("Warning: {}", text), Some("  "), Some(Color::Red), None)
}


fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}


const KATAKANA_LABELS: &str = "アイウエオカキク";


/// The label shown beside the option at `index`: the letter, followed by the
/// katakana used on the printed exams when there is one (`a/ア`, `b/イ`, ...).
fn label(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    match KATAKANA_LABELS.chars().nth(index) {
        Some(kana) => format!("{}/{}", letter, kana),
        None => letter.to_string(),
    }
}


/// Turn what the user typed into an option index. Accepts letters (`a`), numbers
/// counting from one (`1`) and the katakana labels used in Japanese exams (`ア`).
pub fn parse_choice(response: &str) -> Option<usize> {
    let mut chars = response.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        'A'..='Z' => Some(c as usize - 'A' as usize),
        '1'..='9' => Some(c as usize - '1' as usize),
        _ => KATAKANA_LABELS.chars().position(|k| k == c),
    }
}


fn parse_switch(argument: &str) -> Option<bool> {
    match argument.to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}


/// Fold full-width and half-width forms into their canonical characters.
fn normalize(response: &str) -> String {
    response.nfkc().collect::<String>().trim().to_string()
}


/// Split a line into a lowercase command word and the untouched remainder.
fn split_command(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(i) => (line[..i].to_lowercase(), line[i..].trim()),
        None => (line.to_lowercase(), ""),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_can_be_letters_numbers_or_katakana() {
        assert_eq!(parse_choice("a"), Some(0));
        assert_eq!(parse_choice("D"), Some(3));
        assert_eq!(parse_choice("2"), Some(1));
        assert_eq!(parse_choice("ウ"), Some(2));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("ab"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn full_width_input_is_normalized() {
        assert_eq!(parse_choice(&normalize("ｂ")), Some(1));
        assert_eq!(parse_choice(&normalize("３")), Some(2));
        // Half-width katakana.
        assert_eq!(parse_choice(&normalize("ｴ")), Some(3));
    }

    #[test]
    fn commands_split_into_word_and_argument() {
        assert_eq!(split_command("Review  W01-Q02 "), (String::from("review"), "W01-Q02"));
        assert_eq!(split_command("start"), (String::from("start"), ""));
        assert_eq!(split_command(""), (String::new(), ""));
    }

    #[test]
    fn switches_parse() {
        assert_eq!(parse_switch("ON"), Some(true));
        assert_eq!(parse_switch("off"), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn labels_pair_letters_with_katakana() {
        assert_eq!(label(0), "a/ア");
        assert_eq!(label(3), "d/エ");
        assert_eq!(label(9), "j");
    }

    #[test]
    fn every_label_parses_back_to_its_index() {
        for i in 0..8 {
            let label = label(i);
            let mut parts = label.split('/');
            assert_eq!(parse_choice(parts.next().unwrap()), Some(i));
            assert_eq!(parse_choice(parts.next().unwrap()), Some(i));
        }
    }
}
