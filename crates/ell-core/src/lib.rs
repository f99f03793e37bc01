//! Core state types for Ellidra: the player's progress record.
//!
//! This crate knows nothing about scenes or content. It defines the mutable
//! [`PlayerState`] that the dialogue engine operates on, together with the
//! [`Memory`] records it unlocks and the [`InfluenceBounds`] that keep faction
//! scalars in range. Everything here is serde-serializable so a snapshot can
//! be written to any key-value store.

/// Error types used throughout the crate.
pub mod error;
/// Faction influence scalars and their bounds.
pub mod influence;
/// Unlockable memory records.
pub mod memory;
/// The player's progress record.
pub mod player;

/// Re-export error types.
pub use error::{StateError, StateResult};
/// Re-export influence types.
pub use influence::InfluenceBounds;
/// Re-export memory types.
pub use memory::Memory;
/// Re-export player state.
pub use player::PlayerState;
