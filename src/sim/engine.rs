//! Session driver
//!
//! `Engine` owns the game state and the three timing mechanisms: the
//! level-up interval, the self-rescheduling spawn timer and the per-frame
//! fall/resolution loop. All of them are driven by the host's clock through
//! `start` and `frame`; nothing runs in the background.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::ItemKind;
use super::event::{EndReason, EventBus, EventSink, GameEvent};
use super::level::level_config;
use super::spawn::{pick_kind, pick_zone, spawn_delay};
use super::state::{FallingItem, GamePhase, GameState, RngState, Zone};
use super::timer::{TimerKind, TimerToken, Timers};
use crate::consts::MAX_LEVEL;
use crate::tuning::{Tuning, TuningError};

/// Final numbers of an ended session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub score: u64,
    pub level: u32,
    pub fruits_caught: u32,
    pub duration_ms: u64,
}

#[derive(Debug)]
pub struct Engine {
    state: GameState,
    tuning: Tuning,
    rng_state: RngState,
    rng: Pcg32,
    timers: Timers,
    level_timer: Option<TimerToken>,
    spawn_timer: Option<TimerToken>,
    /// Whether the fall/resolution loop runs on `frame`
    frame_loop: bool,
    /// Latest host time seen (ms)
    clock_ms: u64,
    bus: EventBus,
    last_summary: Option<SessionSummary>,
}

impl Engine {
    /// Engine with custom balance. Rejects tuning that `Tuning::validate` refuses.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    /// Engine with stock balance
    pub fn with_seed(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            state: GameState::new(tuning.max_misses),
            rng: rng_state.to_rng(),
            rng_state,
            tuning,
            timers: Timers::new(),
            level_timer: None,
            spawn_timer: None,
            frame_loop: false,
            clock_ms: 0,
            bus: EventBus::new(),
            last_summary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Summary of the most recent ended session, cleared on start
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Register an observer. Observers see every event, in order, as it is
    /// emitted; once one is registered, events are no longer queued.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    /// Take all queued events, oldest first. Only hosts without observers get any.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain()
    }

    #[cfg(test)]
    fn pending_events(&self) -> &[GameEvent] {
        self.bus.pending()
    }

    /// Fall duration items are currently resolved against
    pub fn fall_duration_ms(&self) -> u64 {
        level_config(self.state.level).fall_duration_ms
    }

    /// Progress of an active item at the engine clock
    pub fn progress(&self, item_id: u32) -> Option<f64> {
        let item = self.state.item(item_id)?;
        Some(item.progress(self.clock_ms, self.fall_for(item)))
    }

    /// Begin a fresh session at host time `now_ms`. A running session is stopped first.
    pub fn start(&mut self, now_ms: u64) {
        if self.state.is_active() {
            self.stop();
        }

        self.clock_ms = now_ms;
        self.state = GameState::new(self.tuning.max_misses);
        self.state.phase = GamePhase::Active;
        self.state.started_at_ms = now_ms;
        self.last_summary = None;
        let seed = self.rng_state.seed;
        log::info!("Session started at {now_ms}ms (seed {seed})");

        self.emit_score();

        let interval = self.tuning.level_up_interval_ms;
        let token = self.timers.every(TimerKind::LevelUp, now_ms, interval);
        self.level_timer = Some(token);
        if self.tuning.autospawn {
            self.spawn_and_reschedule(now_ms);
        }
        self.frame_loop = true;
    }

    /// Cancel the session without reporting a result
    pub fn stop(&mut self) {
        let was_active = self.state.is_active();
        self.halt();
        if was_active {
            self.state.phase = GamePhase::Idle;
            log::info!("Session stopped, score {}", self.state.score);
        }
    }

    /// Feed a classifier label. Unknown labels and inactive sessions are ignored.
    pub fn on_pose_detected(&mut self, label: &str) {
        if !self.state.is_active() {
            log::trace!("Pose {label:?} ignored: session not active");
            return;
        }
        let Some(zone) = Zone::from_label(label) else {
            log::trace!("Pose {label:?} not a zone, ignored");
            return;
        };
        if zone != self.state.basket {
            self.state.basket = zone;
            self.bus.emit(GameEvent::BasketMoved { zone });
        }
    }

    /// One rendering frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: u64) {
        if !self.frame_loop || !self.state.is_active() {
            return;
        }
        let now_ms = now_ms.max(self.clock_ms);

        // Catch up timers in due order, resolving falls at each timer's time
        while self.state.is_active() {
            let Some(fired) = self.timers.pop_due(now_ms) else {
                break;
            };
            self.clock_ms = fired.due_ms.max(self.clock_ms);
            self.resolve_falls(self.clock_ms);
            if !self.state.is_active() {
                break;
            }
            match fired.kind {
                TimerKind::LevelUp => self.level_up(),
                TimerKind::Spawn => {
                    if self.spawn_timer == Some(fired.token) {
                        self.spawn_timer = None;
                    }
                    self.spawn_and_reschedule(fired.due_ms);
                }
            }
        }

        self.clock_ms = now_ms;
        if self.state.is_active() {
            self.resolve_falls(now_ms);
        }
        self.check_invariants();
    }

    /// Drop an item in at the current clock, as the spawner would.
    /// Returns the new item's ID, or None when no session is active.
    pub fn spawn_item(&mut self, kind: ItemKind, zone: Zone) -> Option<u32> {
        if !self.state.is_active() {
            return None;
        }
        Some(self.create_item(kind, zone, self.clock_ms))
    }

    fn spawn_and_reschedule(&mut self, at_ms: u64) {
        if !self.state.is_active() {
            return;
        }
        let kind = pick_kind(&mut self.rng, self.state.level);
        let zone = pick_zone(&mut self.rng);
        self.create_item(kind, zone, at_ms);

        let delay = spawn_delay(&mut self.rng, &self.tuning);
        let token = self.timers.once(TimerKind::Spawn, at_ms, delay);
        self.spawn_timer = Some(token);
    }

    fn create_item(&mut self, kind: ItemKind, zone: Zone, at_ms: u64) -> u32 {
        let fall_duration_ms = self.fall_duration_ms();
        let item = FallingItem {
            id: self.state.next_item_id(),
            kind,
            zone,
            created_at_ms: at_ms,
            spawn_fall_ms: fall_duration_ms,
        };
        let id = item.id;
        let (tag, lane) = (kind.tag(), zone.as_str());
        log::debug!("Spawned #{id} {tag} in {lane} at {at_ms}ms");

        self.state.items.push(item.clone());
        self.bus.emit(GameEvent::ItemCreated {
            item,
            fall_duration_ms,
        });
        id
    }

    fn fall_for(&self, item: &FallingItem) -> u64 {
        if self.tuning.freeze_fall_duration {
            item.spawn_fall_ms
        } else {
            self.fall_duration_ms()
        }
    }

    fn level_up(&mut self) {
        if self.state.level < MAX_LEVEL {
            self.state.level += 1;
            log::info!("Level up: {}", self.state.level);
        }
        self.emit_score();
    }

    /// Resolve every item whose fall is complete at `now_ms`.
    /// Removal is batched after the scan, in resolution order.
    fn resolve_falls(&mut self, now_ms: u64) {
        let landed: Vec<(u32, ItemKind, Zone)> = self
            .state
            .items
            .iter()
            .filter(|item| item.progress(now_ms, self.fall_for(item)) >= 1.0)
            .map(|item| (item.id, item.kind, item.zone))
            .collect();

        let mut removed = Vec::with_capacity(landed.len());
        for (id, kind, zone) in landed {
            if !self.state.is_active() {
                // end_game already cleared the field
                break;
            }
            if zone == self.state.basket {
                log::debug!("Caught #{id} {}", kind.tag());
                self.handle_catch(kind);
            } else {
                log::debug!("Missed #{id} {}", kind.tag());
                self.handle_miss(kind);
            }
            removed.push(id);
        }

        for id in removed {
            if let Some(pos) = self.state.items.iter().position(|i| i.id == id) {
                self.state.items.remove(pos);
                self.bus.emit(GameEvent::ItemRemoved { item_id: id });
            }
        }
    }

    fn handle_catch(&mut self, kind: ItemKind) {
        if kind.is_hazard() {
            self.end_game(EndReason::BombCaught);
            return;
        }
        let state = &mut self.state;
        state.score += kind.score();
        state.combo += 1;
        state.fruits_caught += 1;
        let bonus = self.tuning.combo_bonus(state.combo);
        if bonus > 0 {
            log::debug!("Combo {} bonus +{bonus}", state.combo);
            state.score += bonus;
        }
        self.emit_score();
    }

    fn handle_miss(&mut self, kind: ItemKind) {
        if kind.is_hazard() {
            return;
        }
        self.state.miss_count += 1;
        self.state.combo = 0;
        self.emit_score();
        if self.state.miss_count >= self.state.max_misses {
            self.end_game(EndReason::TooManyMisses);
        }
    }

    /// Terminate the session and report the result
    fn end_game(&mut self, reason: EndReason) {
        if !self.state.is_active() {
            return;
        }
        self.halt();
        self.state.phase = GamePhase::Ended;
        self.state.combo = 0;

        let summary = SessionSummary {
            reason,
            score: self.state.score,
            level: self.state.level,
            fruits_caught: self.state.fruits_caught,
            duration_ms: self.clock_ms.saturating_sub(self.state.started_at_ms),
        };
        log::info!(
            "Game over ({reason}): score {}, level {}, {} fruits",
            summary.score,
            summary.level,
            summary.fruits_caught
        );
        self.bus.emit(GameEvent::GameEnded {
            reason,
            score: summary.score,
            level: summary.level,
            fruits_caught: summary.fruits_caught,
        });
        self.last_summary = Some(summary);
    }

    /// Cancel every timer and the frame loop, then clear the field
    fn halt(&mut self) {
        if let Some(token) = self.level_timer.take() {
            self.timers.cancel(token);
        }
        if let Some(token) = self.spawn_timer.take() {
            self.timers.cancel(token);
        }
        self.frame_loop = false;
        debug_assert!(self.timers.is_empty(), "timer outlived its session");

        for item in std::mem::take(&mut self.state.items) {
            self.bus.emit(GameEvent::ItemRemoved { item_id: item.id });
        }
    }

    fn emit_score(&mut self) {
        let s = &self.state;
        self.bus.emit(GameEvent::ScoreChanged {
            score: s.score,
            level: s.level,
            miss_count: s.miss_count,
            max_misses: s.max_misses,
            combo: s.combo,
        });
    }

    fn check_invariants(&self) {
        let s = &self.state;
        debug_assert!(s.miss_count <= s.max_misses);
        debug_assert!(!(s.miss_count == s.max_misses && s.is_active()));
        debug_assert!((1..=MAX_LEVEL).contains(&s.level));
    }
}
