//! Scene graph content: nodes, choices, requirements and effects.

mod choice;
mod effect;
mod node;
mod requirement;

pub use choice::Choice;
pub use effect::{AppliedEffect, Effect};
pub use node::{DialogueNode, SceneText};
pub use requirement::{Comparison, ListOperator, Requirement};
