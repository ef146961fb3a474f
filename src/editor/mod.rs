// src/editor/mod.rs
//
// Editing sessions over the persisted settings. The configure command builds
// a session, applies the requested edits, and saves it back through the store.

pub mod behavior_editor;
pub mod commands;
pub mod settings_session;

pub use behavior_editor::{BehaviorEditor, BehaviorValue};
pub use commands::{run_configure, ConfigureCommand};
pub use settings_session::{ImageEntry, SettingsSession};

use thiserror::Error;

use crate::models::ConfigurationBehaviorType;
use crate::services::StoreError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{behavior} does not accept the value {value}")]
    ValueKind {
        behavior: ConfigurationBehaviorType,
        value: BehaviorValue,
    },
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("no image at index {index} (there are {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, EditorError>;
