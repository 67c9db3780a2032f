use clap::Parser;
use std::io::{self, BufRead};
use todolist_cli::cli::Cli;
use todolist_cli::shell::{Shell, help_text, is_informational, normalize_parse_error};
use todolist_core::config::load_config_with_fallback;
use todolist_core::error::AppError;
use todolist_core::logging::{init_logging, resolve_level};

fn run_interactive(shell: &mut Shell) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            println!("{}", help_text());
            continue;
        }

        match shell.execute_line(line) {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => {}
            Err(err) => eprintln!("ERROR: {}", err),
        }
    }

    Ok(())
}

fn start(cli: &Cli) -> Result<Shell, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: using default configuration: {}", err);
    }

    let mut shell = Shell::new(loaded.config).with_json(cli.json);
    shell.apply_overrides(&cli.config_override)?;

    let level = resolve_level(shell.config().log_level.as_deref())?;
    init_logging(level)?;

    Ok(shell)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let mut shell = match start(&cli) {
        Ok(shell) => shell,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if cli.command.is_none() {
        if let Err(err) = run_interactive(&mut shell) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    match shell.execute(cli) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    }
}
