use chrono::DateTime;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ell_core::PlayerState;

use crate::settings::Settings;

pub fn run(settings: &Settings) -> Result<(), String> {
    let saves = super::open_saves(&settings.save);
    let snapshot = saves
        .try_load()
        .map_err(|e| format!("cannot read save: {e}"))?;

    let Some(snapshot) = snapshot else {
        println!("  No saved game in {}.", settings.save.dir.display());
        return Ok(());
    };

    let saved_at = DateTime::from_timestamp_millis(snapshot.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| snapshot.timestamp.to_string());

    let state = &snapshot.state;
    println!("  {} ({})", state.player_name.bold(), saved_at.dimmed());
    println!(
        "  scene:     {}",
        state.current_scene.as_deref().unwrap_or("(none)")
    );
    println!("  languages: {}", join_or_none(state.known_languages.iter()));
    println!("  completed: {} scenes", state.completed_scenes.len());
    println!();

    print_memories(state);
    print_factions(state);

    Ok(())
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let items: Vec<&str> = items.map(String::as_str).collect();
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn print_memories(state: &PlayerState) {
    if state.memories.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Memory", "Title", "Status"]);
    for (id, memory) in &state.memories {
        let status = if memory.is_unlocked() { "unlocked" } else { "locked" };
        table.add_row(vec![id.as_str(), memory.title.as_str(), status]);
    }
    println!("{table}");
}

fn print_factions(state: &PlayerState) {
    if state.faction_influence.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Faction", "Influence"]);
    for (name, value) in &state.faction_influence {
        table.add_row(vec![name.clone(), value.to_string()]);
    }
    println!("{table}");
}
