pub mod autosave;
pub mod config;
pub mod error;
pub mod persist;
pub mod registry;
pub mod round;
pub mod storage;

pub use config::ScorecardConfig;
pub use error::{ConfigError, EditError, ExportError, ImportError, StorageError};
pub use registry::GameRegistry;
pub use round::{Round, RoundResult, RoundState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

#[cfg(target_family = "wasm")]
pub use storage::LocalStorage;
