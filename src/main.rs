/**
 * Drill multiple-choice questions from the command line.
 */
use std::io;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use colored::*;

use quizdrill::bank::{discover_batches, Bank};
use quizdrill::common::{Command, DrillError, Options, Result};
use quizdrill::iohelper::confirm;
use quizdrill::my_writeln;
use quizdrill::persistence::{get_storage_path, require_app_dir_path, MemoryStorage, SqliteStorage, Storage};
use quizdrill::session::{Config, Engine, Intent, Outcome};
use quizdrill::shell::{self, ShellOptions};
use quizdrill::solved::SolvedSet;
use quizdrill::sources::SourceLinker;


fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = Options::parse();
    if options.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(options) {
        match e {
            DrillError::ReadlineInterrupted => {},
            e => {
                eprintln!("{}: {}", "Error".red(), e);
                ::std::process::exit(2);
            }
        }
    }
}


fn run(options: Options) -> Result<()> {
    let app_dir = require_app_dir_path(options.data_dir.as_deref())?;

    let bank_paths = if options.banks.is_empty() {
        let data_dir = app_dir.join("data");
        let found = discover_batches(&data_dir);
        if found.is_empty() {
            return Err(DrillError::NoBank(data_dir));
        }
        found
    } else {
        options.banks.clone()
    };
    let bank = Bank::load(&bank_paths)?;
    log::info!("bank has {} question(s) from {} batch(es)", bank.len(), bank_paths.len());

    let asset_root = options.assets.clone()
        .or_else(|| bank_paths[0].parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if options.ephemeral {
        dispatch(options.cmd, &bank, SolvedSet::load(MemoryStorage::new()), asset_root)
    } else {
        let storage = SqliteStorage::open(&get_storage_path(&app_dir))?;
        dispatch(options.cmd, &bank, SolvedSet::load(storage), asset_root)
    }
}


fn dispatch<S: Storage>(
    cmd: Command, bank: &Bank, solved: SolvedSet<S>, asset_root: PathBuf
) -> Result<()> {
    let mut writer = io::stdout();

    match cmd {
        Command::Take(options) => {
            let config = Config { shuffle: options.shuffle, skip_solved: options.skip_solved };
            let mut engine = Engine::new(bank, solved, config, rand::thread_rng());
            let mut reader = rustyline::Editor::<()>::new();
            let shell_options = ShellOptions { show_images: !options.no_images, asset_root };
            shell::run(&mut engine, &mut writer, &mut reader, &shell_options)
        },
        Command::Review(options) => {
            let mut engine = Engine::new(bank, solved, Config::default(), rand::thread_rng());
            if engine.apply(Intent::Review(options.id.clone()))? != Outcome::Applied {
                return Err(DrillError::QuestionNotFound(options.id));
            }
            let mut reader = rustyline::Editor::<()>::new();
            let shell_options = ShellOptions { show_images: !options.no_images, asset_root };
            shell::run(&mut engine, &mut writer, &mut reader, &shell_options)
        },
        Command::Status => {
            shell::print_status(bank, &solved, &mut writer)
        },
        Command::List(options) => {
            shell::print_list(bank, &solved, &mut writer, options.unsolved)
        },
        Command::Reset(options) => {
            let mut solved = solved;
            if solved.is_empty() {
                // The stored entry may still exist if it could not be read.
                solved.clear()?;
                return my_writeln!(writer, "No questions have been solved.");
            }

            let mut reader = rustyline::Editor::<()>::new();
            let message = format!("Forget all {} solved question(s)? ", solved.len());
            if options.force || confirm(&mut reader, &message)? {
                solved.clear()?;
                my_writeln!(writer, "History cleared.")?;
            }
            Ok(())
        },
        Command::Urls(options) => {
            let linker = SourceLinker::new(&options.base_url)?;
            for question in bank.iter() {
                match linker.url(question) {
                    Some(url) => my_writeln!(writer, "[{}] {}", question.id, url)?,
                    None => my_writeln!(writer, "[{}] skipped", question.id)?,
                }
            }
            Ok(())
        },
    }
}
