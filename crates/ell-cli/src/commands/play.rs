use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use ell_dialogue::{
    Action, AppliedEffect, DialogueEngine, DialogueError, DialogueSession, Outcome,
};
use ell_save::{FileStorage, SaveManager};

use crate::settings::Settings;
use crate::typewriter::Typewriter;

const HELP: &str = "  <number>   pick a choice
  <Enter>    continue
  memories   list recovered memories
  status     show languages and standing
  new        start over
  quit       leave the game";

pub fn run(
    path: Option<&Path>,
    settings: &Settings,
    new_game: bool,
    name: Option<&str>,
) -> Result<(), String> {
    let story = super::load_story(path)?;
    let engine = DialogueEngine::new(settings.engine.clone());
    let saves = super::open_saves(&settings.save);
    let player_name = name.unwrap_or(&settings.play.player_name).to_string();

    let saved = if new_game { None } else { saves.load() };
    let resumed = saved.is_some();
    let session = match saved {
        Some(state) => DialogueSession::with_state(story, engine, state),
        None => DialogueSession::new(story, engine, player_name.as_str()),
    };

    let mut player = Player {
        session,
        saves,
        typewriter: Typewriter::new(settings.play.typewriter_ms),
        autosave: settings.play.autosave,
        player_name,
    };

    println!("  {} {}", "Playing".bold(), player.session.story().title());
    if resumed {
        println!("  Welcome back, {}.", player.session.state().player_name);
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    if !player.step(Action::Start)? {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let action = match line.trim() {
            "q" | "quit" => break,
            "h" | "help" => {
                println!("{HELP}\n");
                continue;
            }
            "m" | "memories" => {
                player.print_memories();
                continue;
            }
            "s" | "status" => {
                player.print_status();
                continue;
            }
            "new" => {
                let player_name = player.player_name.clone();
                player.step(Action::NewGame { player_name })?;
                Action::Start
            }
            "" => Action::Continue,
            input => match player.choice_action(input) {
                Ok(action) => action,
                Err(msg) => {
                    println!("{}\n", msg.yellow());
                    continue;
                }
            },
        };

        if !player.step(action)? {
            break;
        }
    }

    Ok(())
}

struct Player {
    session: DialogueSession,
    saves: SaveManager<FileStorage>,
    typewriter: Typewriter,
    autosave: bool,
    player_name: String,
}

impl Player {
    /// Dispatch an action and show the result. Returns whether the dialogue
    /// goes on.
    fn step(&mut self, action: Action) -> Result<bool, String> {
        let transition = match self.session.dispatch(action) {
            Ok(transition) => transition,
            Err(e) => {
                println!("{}\n", player_message(&e).yellow());
                return Ok(true);
            }
        };

        self.report(&transition.applied);
        if self.autosave {
            self.saves.save(self.session.state());
        }

        match transition.outcome {
            Outcome::Entered(_) => {
                self.render()?;
                Ok(true)
            }
            Outcome::Reset => Ok(true),
            Outcome::Complete => {
                println!("  {}\n", "The End.".bold());
                Ok(false)
            }
            Outcome::SceneNotFound(id) => {
                println!("  {}\n", format!("Scene not found: {id}").red());
                Ok(false)
            }
        }
    }

    fn choice_action(&self, input: &str) -> Result<Action, String> {
        let n: usize = input
            .parse()
            .map_err(|_| format!("unknown command: \"{input}\" (try 'help')"))?;
        let choices = self.session.choices();
        n.checked_sub(1)
            .and_then(|i| choices.get(i))
            .map(|view| Action::Choose(view.choice.id.clone()))
            .ok_or_else(|| format!("there is no choice {n}"))
    }

    fn report(&self, applied: &[AppliedEffect]) {
        for change in applied {
            let line = match change {
                AppliedEffect::MemoryUnlocked(id) => {
                    let title = self
                        .session
                        .state()
                        .memory(id)
                        .map_or(id.as_str(), |m| m.title.as_str());
                    format!("A memory returns: {title}.")
                }
                // The consequence log is bookkeeping, not narration
                AppliedEffect::ConsequenceAdded { .. } => continue,
                other => other.to_string(),
            };
            println!("  {}", line.italic().cyan());
        }
    }

    fn render(&self) -> Result<(), String> {
        let Some(node) = self.session.current_scene() else {
            return Ok(());
        };

        println!();
        println!("  {}", node.speaker.bold());
        for page in node.text.pages() {
            self.typewriter
                .line(&format!("  {page}"))
                .map_err(|e| e.to_string())?;
        }
        println!();

        for (i, view) in self.session.choices().iter().enumerate() {
            let label = format!("  {}. {}", i + 1, view.choice.text);
            if !view.available {
                println!("{} {}", label.dimmed(), "(locked)".dimmed());
            } else if self
                .session
                .history()
                .has_selected_choice(&node.id, &view.choice.id)
            {
                println!("{label} {}", "(chosen before)".dimmed());
            } else {
                println!("{label}");
            }
        }
        if self.session.can_continue() {
            println!("  {}", "[Enter] continue".dimmed());
        }
        println!();

        Ok(())
    }

    fn print_memories(&self) {
        let mut any = false;
        for (_, memory) in self.session.state().unlocked_memories() {
            any = true;
            println!("  {}", memory.title.bold());
            if !memory.content.is_empty() {
                println!("  {}", memory.content);
            }
            println!();
        }
        if !any {
            println!("  You remember nothing yet.\n");
        }
    }

    fn print_status(&self) {
        let state = self.session.state();
        let languages: Vec<&str> = state.known_languages.iter().map(String::as_str).collect();
        println!("  {}", state.player_name.bold());
        if languages.is_empty() {
            println!("  languages: (none)");
        } else {
            println!("  languages: {}", languages.join(", "));
        }
        for (faction, value) in &state.faction_influence {
            println!("  {faction}: {value}");
        }
        println!();
    }
}

fn player_message(e: &DialogueError) -> String {
    match e {
        DialogueError::ChoiceLocked(_) => "That choice is not available yet.".to_string(),
        DialogueError::ChoiceRequired(_) => "Pick one of the choices above.".to_string(),
        DialogueError::NoActiveScene => "The story is over. Type 'new' to start again.".to_string(),
        other => other.to_string(),
    }
}
