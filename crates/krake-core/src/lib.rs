pub mod config;
pub mod error;
pub mod types;
pub mod workspace;

pub use config::KrakeConfig;
pub use error::{KrakeError, Result};
pub use types::*;
pub use workspace::WorkspaceRegistry;
