//! Design Studio
//!
//! Backend for an LLM-driven UI design tool. A turn lets the model write
//! React/TSX designs through a closed tool set; submitted designs are
//! validated, given stable element identifiers, persisted and rendered by a
//! supervised preview server.
//!
//! - `services::orchestrator` - the bounded model/tool loop and submission
//! - `services::preview` - preview dev-server lifecycle
//! - `storage` - JSON config file
//! - `state` - explicit shared context for a running instance

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::orchestrator::{Orchestrator, SubmittedFile, TurnOutcome};
pub use services::preview::{PreviewError, PreviewManager, PreviewState, PreviewStatus, StartOptions};
pub use state::AppState;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
