pub mod check;
pub mod export;
pub mod play;
pub mod reset;
pub mod show;
pub mod status;

use std::path::Path;

use colored::Colorize;
use ell_dialogue::prologue::{prologue, prologue_file};
use ell_dialogue::{
    Comparison, DialogueError, Effect, ListOperator, Requirement, Story, StoryFile,
    ValidationIssue,
};
use ell_save::{FileStorage, SaveManager};

use crate::settings::SaveSettings;

/// Read a story file, or the built-in prologue when no path is given.
/// Validation problems are printed before the error is returned.
fn load_story(path: Option<&Path>) -> Result<Story, String> {
    let result = match path {
        Some(path) => Story::load(path),
        None => prologue(),
    };
    result.map_err(|e| match e {
        DialogueError::InvalidStory(issues) => {
            print_issues(&issues);
            "story failed validation".to_string()
        }
        other => other.to_string(),
    })
}

/// Authored content without validation, for commands that report problems
/// themselves.
fn read_story_file(path: Option<&Path>) -> Result<StoryFile, String> {
    match path {
        Some(path) => StoryFile::read(path).map_err(|e| e.to_string()),
        None => Ok(prologue_file()),
    }
}

fn open_saves(settings: &SaveSettings) -> SaveManager<FileStorage> {
    SaveManager::new(FileStorage::new(&settings.dir)).with_key(&settings.key)
}

/// Print validation issues and a summary line to stderr.
fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }

    for issue in issues {
        let line = issue.to_string();
        if issue.is_error() {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}

fn describe_requirement(requirement: &Requirement) -> String {
    match requirement {
        Requirement::Language { key } => format!("knows {key}"),
        Requirement::Memory { key } => format!("remembers {key}"),
        Requirement::Consequence {
            key,
            operator,
            value,
        } => match (operator, value) {
            (Some(ListOperator::Includes), Some(value)) => format!("{key} includes {value}"),
            (Some(ListOperator::Excludes), Some(value)) => format!("{key} excludes {value}"),
            _ => format!("{key} recorded"),
        },
        Requirement::Influence {
            key,
            operator,
            value,
        } => {
            let op = match operator {
                Comparison::AtLeast => ">=",
                Comparison::AtMost => "<=",
                Comparison::Equals => "==",
            };
            format!("{key} {op} {value}")
        }
        Requirement::Custom { key, value } => match value {
            Some(value) => format!("custom {key} ({value})"),
            None => format!("custom {key}"),
        },
    }
}

fn describe_effect(effect: &Effect) -> String {
    match effect {
        Effect::LearnLanguage { key } => format!("learn {key}"),
        Effect::UnlockMemory { key } => format!("unlock memory {key}"),
        Effect::FactionInfluence { key, value } => format!("{key} {value:+}"),
        Effect::AddConsequence { key, value } => format!("record {key} = {value}"),
        Effect::Custom { key, value } => match value {
            Some(value) => format!("custom {key} ({value})"),
            None => format!("custom {key}"),
        },
    }
}
