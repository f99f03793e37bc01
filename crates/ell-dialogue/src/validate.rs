//! Content checks for scenes and stories.
//!
//! [`validate_scene`] looks at one node in isolation. [`validate_story`]
//! additionally checks references between nodes and into the memory
//! catalog. Errors make a story unloadable; warnings are reported but do not
//! block play.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use strsim::jaro_winkler;

use crate::scene::{DialogueNode, Effect, Requirement};
use crate::story::StoryFile;

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Content cannot be loaded.
    Error,
    /// Content loads but is probably wrong.
    Warning,
}

/// A problem found in story content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// How serious the issue is.
    pub severity: Severity,
    /// Scene the issue was found in (empty for story-level issues).
    pub scene: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Create an error.
    pub fn error(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            scene: scene.into(),
            message: message.into(),
        }
    }

    /// Create a warning.
    pub fn warning(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            scene: scene.into(),
            message: message.into(),
        }
    }

    /// Whether this issue blocks loading.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.scene.is_empty() {
            write!(f, "{level}: {}", self.message)
        } else {
            write!(f, "{level}: scene '{}': {}", self.scene, self.message)
        }
    }
}

/// Check a single node for missing fields.
pub fn validate_scene(node: &DialogueNode) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let scene = node.id.as_str();

    if node.id.trim().is_empty() {
        issues.push(ValidationIssue::error(scene, "missing id"));
    }
    if node.speaker.trim().is_empty() {
        issues.push(ValidationIssue::error(scene, "missing speaker"));
    }
    if node.text.is_blank() {
        issues.push(ValidationIssue::error(scene, "missing text"));
    }

    for (i, choice) in node.choices.iter().enumerate() {
        if choice.id.trim().is_empty() {
            issues.push(ValidationIssue::error(
                scene,
                format!("choice #{} is missing an id", i + 1),
            ));
        }
        if choice.text.trim().is_empty() {
            issues.push(ValidationIssue::error(
                scene,
                format!("choice #{} is missing text", i + 1),
            ));
        }
    }

    issues
}

/// Check a whole story: every scene, plus references between them.
pub fn validate_story(story: &StoryFile) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if story.scenes.is_empty() {
        issues.push(ValidationIssue::error("", "story has no scenes"));
        return issues;
    }

    let mut ids: HashMap<&str, usize> = HashMap::new();
    for node in &story.scenes {
        *ids.entry(node.id.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = ids
        .iter()
        .filter(|&(id, &count)| count > 1 && !id.is_empty())
        .map(|(id, _)| *id)
        .collect();
    duplicates.sort_unstable();
    for id in duplicates {
        issues.push(ValidationIssue::error(id, "duplicate scene id"));
    }

    if !ids.contains_key(story.start.as_str()) {
        issues.push(ValidationIssue::error(
            "",
            missing_target_message("start scene", &story.start, &ids),
        ));
    }

    for node in &story.scenes {
        issues.extend(validate_scene(node));
        validate_references(node, story, &ids, &mut issues);
    }

    for id in unreachable_scenes(story) {
        issues.push(ValidationIssue::warning(
            id,
            format!("not reachable from '{}'", story.start),
        ));
    }

    issues
}

/// Check one node's outgoing links, choice ids and keys.
fn validate_references(
    node: &DialogueNode,
    story: &StoryFile,
    ids: &HashMap<&str, usize>,
    issues: &mut Vec<ValidationIssue>,
) {
    let scene = node.id.as_str();

    if let Some(target) = &node.auto_advance
        && !ids.contains_key(target.as_str())
    {
        issues.push(ValidationIssue::error(
            scene,
            missing_target_message("autoAdvance", target, ids),
        ));
    }

    let mut seen_choices = HashSet::new();
    for choice in &node.choices {
        if !choice.id.is_empty() && !seen_choices.insert(choice.id.as_str()) {
            issues.push(ValidationIssue::error(
                scene,
                format!("duplicate choice id '{}'", choice.id),
            ));
        }

        if let Some(target) = &choice.next_scene
            && !ids.contains_key(target.as_str())
        {
            issues.push(ValidationIssue::error(
                scene,
                missing_target_message(&format!("choice '{}' nextScene", choice.id), target, ids),
            ));
        }

        for requirement in &choice.requirements {
            validate_requirement(scene, &choice.id, requirement, story, issues);
        }
        for effect in &choice.effects {
            validate_effect(scene, effect, story, issues);
        }
    }

    for effect in &node.effects {
        validate_effect(scene, effect, story, issues);
    }
}

fn validate_requirement(
    scene: &str,
    choice: &str,
    requirement: &Requirement,
    story: &StoryFile,
    issues: &mut Vec<ValidationIssue>,
) {
    match requirement {
        Requirement::Memory { key } if !story.memories.contains_key(key) => {
            issues.push(ValidationIssue::warning(
                scene,
                format!("choice '{choice}' requires unknown memory '{key}'"),
            ));
        }
        Requirement::Consequence {
            key,
            operator: Some(op),
            value: None,
        } => {
            issues.push(ValidationIssue::error(
                scene,
                format!("choice '{choice}': consequence '{key}' uses {op:?} without a value"),
            ));
        }
        _ => {}
    }
}

fn validate_effect(
    scene: &str,
    effect: &Effect,
    story: &StoryFile,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Effect::UnlockMemory { key } = effect
        && !story.memories.contains_key(key)
    {
        issues.push(ValidationIssue::warning(
            scene,
            format!("unlocks unknown memory '{key}'"),
        ));
    }
}

fn missing_target_message(what: &str, target: &str, ids: &HashMap<&str, usize>) -> String {
    let mut message = format!("{what} points to missing scene '{target}'");
    if let Some(suggestion) = suggest(target, ids.keys().copied()) {
        message.push_str(&format!(" (did you mean '{suggestion}'?)"));
    }
    message
}

/// Closest scene id above the similarity threshold.
fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|id| (id, jaro_winkler(input, id)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Scene ids that cannot be reached from the start scene, in authored order.
fn unreachable_scenes(story: &StoryFile) -> Vec<&str> {
    let by_id: HashMap<&str, &DialogueNode> =
        story.scenes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut reached = HashSet::new();
    let mut queue = VecDeque::new();
    if by_id.contains_key(story.start.as_str()) {
        reached.insert(story.start.as_str());
        queue.push_back(story.start.as_str());
    }
    while let Some(id) = queue.pop_front() {
        let Some(node) = by_id.get(id) else {
            continue;
        };
        for target in node.targets() {
            if by_id.contains_key(target) && reached.insert(target) {
                queue.push_back(target);
            }
        }
    }

    if reached.is_empty() {
        return Vec::new();
    }
    story
        .scenes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !id.is_empty() && !reached.contains(id))
        .collect()
}
