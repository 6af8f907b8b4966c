//! Outbound notifications
//!
//! The engine never calls back into the presentation layer for answers. It
//! emits `GameEvent`s. With observers subscribed, each event goes to every
//! `EventSink`; with none, events queue up for `Engine::drain_events`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{FallingItem, Zone};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    BombCaught,
    TooManyMisses,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::BombCaught => "bomb caught",
            EndReason::TooManyMisses => "too many fruits missed",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the presentation layer should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged {
        score: u64,
        level: u32,
        miss_count: u32,
        max_misses: u32,
        combo: u32,
    },
    ItemCreated {
        item: FallingItem,
        /// Needed to animate the fall; the engine does not track visual position
        fall_duration_ms: u64,
    },
    ItemRemoved {
        item_id: u32,
    },
    BasketMoved {
        zone: Zone,
    },
    GameEnded {
        reason: EndReason,
        score: u64,
        level: u32,
        fruits_caught: u32,
    },
}

/// Observer for engine notifications
pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent),
{
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fan-out to subscribers, or a queue for polling hosts when nobody subscribed
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
    queue: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events already queued stay queued until drained; later ones only reach sinks.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn emit(&mut self, event: GameEvent) {
        if self.sinks.is_empty() {
            self.queue.push(event);
            return;
        }
        for sink in &mut self.sinks {
            sink.notify(&event);
        }
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[GameEvent] {
        &self.queue
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .field("queue", &self.queue)
            .finish()
    }
}
