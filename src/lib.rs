pub mod capture;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod present;
pub mod prompt;
pub mod scheduler;
pub mod session;
pub mod ui;

// Re-exports for convenience
pub use capture::{Capture, CaptureStyle, RegionCapture};
pub use config::{Config, Tool};
pub use error::{Error, Result};
pub use models::{Grade, IMAGE_FLASHCARD_MODEL, Item, ItemData, ItemId, QueueState};
pub use present::{DisplayResult, DisplayStatus, ImageViewer, Presenter};
pub use prompt::{GumPrompt, Prompt, TerminalPrompt};
pub use scheduler::{CommandScheduler, Scheduler};
pub use session::{AddOutcome, AddStage, QueueCounts, ReviewOutcome, ReviewStage, Session};
