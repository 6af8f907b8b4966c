//! Game engine module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Time only comes from the host through `Engine::start` / `Engine::frame`
//! - Seeded RNG only
//! - Stable iteration order (item creation order)

pub mod catalog;
pub mod engine;
pub mod event;
pub mod level;
pub mod spawn;
pub mod state;
pub mod timer;

pub use catalog::{CATALOG, ItemKind};
pub use engine::{Engine, SessionSummary};
pub use event::{EndReason, EventBus, EventSink, GameEvent};
pub use level::{LevelConfig, kind_weights, level_config};
pub use state::{FallingItem, GamePhase, GameState, Zone};
pub use timer::{TimerKind, TimerToken, Timers};
