use std::fmt::Write as _;
use std::path::Path;

use ell_dialogue::StoryFile;

use super::{describe_effect, describe_requirement};

pub fn run(path: Option<&Path>, format: &str, output: Option<&Path>) -> Result<(), String> {
    let file = super::load_story(path)?.to_file();

    let content = match format {
        "json" => {
            let mut json = file
                .to_json()
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            json.push('\n');
            json
        }
        "markdown" | "md" => export_markdown(&file),
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: json, markdown"
            ));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}

/// A readable script of the story, one section per scene.
fn export_markdown(file: &StoryFile) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", file.title);
    let _ = writeln!(out, "Starts at `{}`.\n", file.start);

    if !file.memories.is_empty() {
        out.push_str("## Memories\n\n");
        for (id, seed) in &file.memories {
            let _ = writeln!(out, "- **{}** (`{id}`)", seed.title);
        }
        out.push('\n');
    }

    if !file.factions.is_empty() {
        out.push_str("## Factions\n\n");
        for (name, value) in &file.factions {
            let _ = writeln!(out, "- {name}: {value}");
        }
        out.push('\n');
    }

    out.push_str("---\n\n");

    for node in &file.scenes {
        let _ = writeln!(out, "## {}\n", node.id);
        for page in node.text.pages() {
            let _ = writeln!(out, "**{}:** {page}\n", node.speaker);
        }
        for effect in &node.effects {
            let _ = writeln!(out, "> {}", describe_effect(effect));
        }
        if !node.effects.is_empty() {
            out.push('\n');
        }

        for choice in &node.choices {
            let target = choice.next_scene.as_deref().unwrap_or("end");
            let _ = write!(out, "- {} → `{target}`", choice.text);
            let requires: Vec<_> = choice.requirements.iter().map(describe_requirement).collect();
            if !requires.is_empty() {
                let _ = write!(out, " *(requires {})*", requires.join(", "));
            }
            out.push('\n');
        }
        if !node.choices.is_empty() {
            out.push('\n');
        }

        if let Some(next) = &node.auto_advance {
            let _ = writeln!(out, "→ `{next}`\n");
        }
    }

    out
}
