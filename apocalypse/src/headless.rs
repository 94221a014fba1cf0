//! Line-oriented play without the TUI.
//!
//! Prints the location box, the countdown and the numbered menu, then reads
//! one line from stdin. A number picks an option; lines starting with `#`
//! are meta commands. Suitable for scripted runs:
//!
//! ```bash
//! printf '1\n3\n#status\n#quit\n' | apocalypse --headless --seed 7
//! ```

use apocalypse_core::{rules::status_report, GameConfig, HeadlessGame, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const RULE: &str = "==================================================";

/// A `#` command typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    /// Save to a path, or to the autosave file
    Save(Option<PathBuf>),
    Load(PathBuf),
    Status,
    Help,
    /// A known command missing its argument
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parse the text after `#`.
    fn parse(text: &str) -> Self {
        let mut words = text.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next().map(PathBuf::from);
        match name.as_str() {
            "quit" | "exit" => Command::Quit,
            "save" => Command::Save(arg),
            "load" => arg.map_or(Command::Usage("#load <path>"), Command::Load),
            "status" => Command::Status,
            "help" | "" => Command::Help,
            _ => Command::Unknown(name),
        }
    }
}

/// Run the prompt loop until the player quits or stdin closes.
pub async fn run_headless(mut game: HeadlessGame, config: GameConfig) -> Result<(), SessionError> {
    println!("=== Apocalypse Nightmare ===");
    for entry in &game.session().state().narrative_history {
        println!("{}", entry.content);
    }
    println!();
    print_help();
    print_screen(&game);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        let line = line.trim();

        if let Some(text) = line.strip_prefix('#') {
            match Command::parse(text) {
                Command::Quit => {
                    println!("Goodbye!");
                    break;
                }
                Command::Save(path) => {
                    let path = path.unwrap_or_else(|| game.session().auto_save_path());
                    match game.save(&path).await {
                        Ok(()) => println!("[SAVED] Game saved to {}", path.display()),
                        Err(e) => println!("[ERROR] Save failed: {e}"),
                    }
                }
                Command::Load(path) => match HeadlessGame::load(config.clone(), &path).await {
                    Ok(loaded) => {
                        game = loaded;
                        println!("[LOADED] Game loaded from {}", path.display());
                        print_screen(&game);
                    }
                    Err(e) => println!("[ERROR] Load failed: {e}"),
                },
                Command::Status => {
                    println!("[STATUS]");
                    for line in status_report(game.session().state()) {
                        println!("  {line}");
                    }
                }
                Command::Help => print_help(),
                Command::Usage(usage) => println!("[ERROR] Usage: {usage}"),
                Command::Unknown(name) => {
                    println!("[ERROR] Unknown command '#{name}'. Type #help for help.")
                }
            }
            flush();
            continue;
        }

        if line.is_empty() {
            print_screen(&game);
            continue;
        }

        match game.send(line) {
            Ok(response) => {
                println!();
                println!("{}", response.narrative);
                if response.quit {
                    break;
                }
                if response.ending.is_some() {
                    println!();
                    println!("[GAME OVER] #load <path> resumes a save, #quit exits.");
                } else {
                    print_screen(&game);
                }
            }
            Err(SessionError::GameOver) => println!("[GAME OVER] #load <path> or #quit."),
            Err(e) => println!("[ERROR] {e}"),
        }
        flush();
    }

    Ok(())
}

/// Print the location box, countdown and numbered menu.
fn print_screen(game: &HeadlessGame) {
    let state = game.session().state();
    println!();
    println!("{RULE}");
    println!("Location: {}", state.location);
    println!(
        "Time left: {} ({} hours, {})",
        state.clock.display(),
        state.clock.hours_remaining().floor(),
        state.clock.phase
    );
    println!("{RULE}");
    for line in game.menu_lines() {
        println!("{line}");
    }
    print!("> ");
    flush();
}

fn print_help() {
    println!("Commands:");
    println!("  <number>     - Choose a menu option");
    println!("  #quit        - Exit the game");
    println!("  #save [path] - Save the game (default: autosave)");
    println!("  #load <path> - Load a saved game");
    println!("  #status      - Show current game status");
    println!("  #help        - Show this help");
}

fn flush() {
    io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("EXIT"), Command::Quit);
        assert_eq!(Command::parse("status"), Command::Status);
        assert_eq!(Command::parse(""), Command::Help);
    }

    #[test]
    fn test_save_path_is_optional() {
        assert_eq!(Command::parse("save"), Command::Save(None));
        assert_eq!(
            Command::parse("save run.json"),
            Command::Save(Some(PathBuf::from("run.json")))
        );
    }

    #[test]
    fn test_load_needs_a_path() {
        assert_eq!(Command::parse("load"), Command::Usage("#load <path>"));
        assert_eq!(
            Command::parse("load saves/a.json"),
            Command::Load(PathBuf::from("saves/a.json"))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::parse("dance now"), Command::Unknown("dance".to_string()));
    }
}
