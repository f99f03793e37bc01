use std::path::Path;

use colored::Colorize;

use super::{describe_effect, describe_requirement};

pub fn run(path: Option<&Path>, scene_id: &str) -> Result<(), String> {
    let story = super::load_story(path)?;

    let node = story
        .scene(scene_id)
        .ok_or_else(|| format!("scene not found: \"{scene_id}\""))?;

    // Header
    println!("  {} [{}]", node.id.bold(), node.speaker.dimmed());
    println!();

    for page in node.text.pages() {
        println!("  {page}");
    }
    println!();

    if !node.effects.is_empty() {
        println!("  {}", "On entry:".bold());
        for effect in &node.effects {
            println!("    {}", describe_effect(effect));
        }
        println!();
    }

    if !node.choices.is_empty() {
        println!("  {}", "Choices:".bold());
        for (i, choice) in node.choices.iter().enumerate() {
            let target = choice.next_scene.as_deref().unwrap_or("(end)");
            println!("    {}. {} -> {}", i + 1, choice.text, target.cyan());
            println!("       id: {}", choice.id.dimmed());
            for requirement in &choice.requirements {
                println!("       requires: {}", describe_requirement(requirement));
            }
            for effect in &choice.effects {
                println!("       effect:   {}", describe_effect(effect));
            }
        }
        println!();
    }

    match &node.auto_advance {
        Some(next) => println!("  continues to {}", next.cyan()),
        None if node.choices.is_empty() => println!("  {}", "(ends the sequence)".dimmed()),
        None => {}
    }

    Ok(())
}
