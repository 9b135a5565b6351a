use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod db;
mod error;
mod models;
mod services;
mod tui;

use app::App;
use config::Config;
use db::Repository;
use error::{AppError, Result};
use models::UserUpdate;
use services::{backup, quotes, routines, store, users};
use tui::{draw, handle_key_event};

const USAGE: &str = "Usage: hugmi [--import <quotes.json> | --export <backup.json> | --add-user <name> | \
--switch-user <id> | --rename-user <name> | --delete-user <id> | --list-users | --stats | --reset]";

enum Command {
    Import(PathBuf),
    Export(PathBuf),
    AddUser(String),
    SwitchUser(String),
    RenameUser(String),
    DeleteUser(String),
    ListUsers,
    Stats,
    Reset,
}

fn parse_args(args: &[String]) -> Result<Option<Command>> {
    let Some(flag) = args.get(1) else {
        return Ok(None);
    };
    let value = || {
        args.get(2)
            .cloned()
            .ok_or_else(|| AppError::InvalidInput(format!("{} needs a value\n{}", flag, USAGE)))
    };

    let command = match flag.as_str() {
        "--import" => Command::Import(PathBuf::from(value()?)),
        "--export" => Command::Export(PathBuf::from(value()?)),
        "--add-user" => Command::AddUser(value()?),
        "--switch-user" => Command::SwitchUser(value()?),
        "--rename-user" => Command::RenameUser(value()?),
        "--delete-user" => Command::DeleteUser(value()?),
        "--list-users" => Command::ListUsers,
        "--stats" => Command::Stats,
        "--reset" => Command::Reset,
        other => {
            return Err(AppError::InvalidInput(format!(
                "unknown argument {}\n{}",
                other, USAGE
            )))
        }
    };
    Ok(Some(command))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    // Load configuration
    let config = Config::load()?;

    // Headless commands run against the database and exit
    if let Some(command) = command {
        let repo = store::open(&config).await?;
        return run_command(&repo, &config, command).await;
    }

    // Initialize app
    let mut app = App::new(&config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_command(repo: &Repository, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Import(path) => {
            let count = quotes::import_quotes(repo, &path).await?;
            println!("Imported {} quotes from {:?}", count, path);
        }

        Command::Export(path) => {
            let user = users::ensure_active_user(repo, config).await?;
            backup::export_backup(repo, &user.id, &path).await?;
            println!("Exported {}'s data to {:?}", user.name, path);
        }

        Command::AddUser(name) => {
            let user = users::add_user(repo, &name, config).await?;
            println!("Added {} ({}) and made them active", user.name, user.id);
        }

        Command::SwitchUser(id) => {
            let user = users::switch_user(repo, &id).await?;
            println!("Switched to {}", user.name);
        }

        Command::RenameUser(name) => {
            let user = users::ensure_active_user(repo, config).await?;
            let update = UserUpdate {
                name: Some(name),
                ..UserUpdate::default()
            };
            let user = repo.update_user(&user.id, update).await?;
            println!("Renamed active user to {}", user.name);
        }

        Command::DeleteUser(id) => {
            repo.delete_user(&id).await?;
            println!("Deleted user {}", id);
        }

        Command::ListUsers => {
            let active = repo.get_active_user_id().await?;
            for user in repo.get_all_users().await? {
                let marker = if active.as_deref() == Some(user.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}  {}", marker, user.id, user.name);
            }
        }

        Command::Stats => print_stats(repo, config).await?,

        Command::Reset => {
            repo.clear_all_data().await?;
            println!("All data cleared");
        }
    }
    Ok(())
}

async fn print_stats(repo: &Repository, config: &Config) -> Result<()> {
    let user = users::ensure_active_user(repo, config).await?;
    let today = Local::now().date_naive();

    let quote = quotes::todays_quote(repo, &user.id, today).await;
    let checklist = routines::todays_checklist(repo, &user.id, today).await;
    let (done, total) = routines::progress(&checklist);
    let streak = repo.current_streak(&user.id, today).await?;
    let viewed = repo.count_viewed_quotes(&user.id).await?;
    let mood = repo.get_mood_log(&user.id, today).await?;

    println!("{} · {}", user.name, today.format("%Y-%m-%d"));
    println!();
    for line in textwrap::wrap(quote.text(config.language), 72) {
        println!("  {}", line);
    }
    println!("    — {}", quote.author);
    println!();
    println!("Routines: {}/{}", done, total);
    println!(
        "Mood:     {}",
        mood.map(|m| m.mood.label()).unwrap_or("not recorded")
    );
    println!("Streak:   {} day(s)", streak);
    println!("Quotes:   {}/{}", viewed, quotes::QUOTE_MILESTONE);
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Pick up a new day when the app is left open overnight
        app.check_day_change().await;

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(
                        key,
                        app.screen,
                        app.routine_input_active,
                        app.show_help,
                        app.celebrating,
                    ) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("hugmi")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_args_opens_tui() {
        assert!(parse_args(&args(&[])).unwrap().is_none());
    }

    #[test]
    fn test_flags_with_values() {
        assert!(matches!(
            parse_args(&args(&["--add-user", "Mina"])).unwrap(),
            Some(Command::AddUser(name)) if name == "Mina"
        ));
        assert!(matches!(
            parse_args(&args(&["--stats"])).unwrap(),
            Some(Command::Stats)
        ));
        assert!(parse_args(&args(&["--import"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
