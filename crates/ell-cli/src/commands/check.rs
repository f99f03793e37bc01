use std::path::Path;

use ell_dialogue::validate_story;

pub fn run(path: Option<&Path>) -> Result<(), String> {
    let file = super::read_story_file(path)?;
    let issues = validate_story(&file);
    super::print_issues(&issues);

    if issues.iter().any(|i| i.is_error()) {
        return Err("story failed validation".into());
    }

    let choices: usize = file.scenes.iter().map(|s| s.choices.len()).sum();
    println!("  All checks passed for '{}'.", file.title);
    println!(
        "  {} scenes, {} choices, {} memories",
        file.scenes.len(),
        choices,
        file.memories.len()
    );

    Ok(())
}
