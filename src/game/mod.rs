//! Game module - session state on top of the engine
//!
//! - [`session`] - the [`Session`] that owns the engine and drives play
//! - [`selection`] - two-click selection state machine
//! - [`scheduler`] - deferred engine replies
//! - [`game_over`] - verdict text held until restart
//! - [`stats`] - engine think-time totals
//! - [`types`] - squares and play modes

pub mod error;
pub mod game_over;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod stats;
pub mod types;

pub use error::{GameError, GameResult};
pub use game_over::GameOverMessage;
pub use scheduler::{Scheduler, TaskHandle};
pub use selection::{ClickAction, Selection};
pub use session::{ClickOutcome, MoveOutcome, Session};
pub use stats::EngineStats;
pub use types::{PlayMode, Square};
