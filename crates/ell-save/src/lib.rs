//! Save games for Ellidra.
//!
//! A [`SaveManager`] writes a versioned [`Snapshot`] of the player state into
//! a key-value [`Storage`] backend. Saving is best-effort and loading falls
//! back to `None`, so a broken save never stops the game.

pub mod error;
pub mod manager;
pub mod snapshot;
pub mod storage;

pub use error::{SaveError, SaveResult};
pub use manager::{DEFAULT_SAVE_KEY, SaveManager};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use storage::{FallbackStorage, FileStorage, MemoryStorage, Storage};
