//! Cancellable timers driven by host timestamps
//!
//! Nothing here sleeps. The host reports the time and `pop_due` hands back
//! whatever has come due, earliest first. Cancelling a token removes its
//! entry, so a cancelled timer can never fire.

/// Handle to an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// What the engine should do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    LevelUp,
    Spawn,
}

#[derive(Debug, Clone)]
struct Entry {
    token: TimerToken,
    kind: TimerKind,
    due_ms: u64,
    /// Some for repeating timers
    period_ms: Option<u64>,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub token: TimerToken,
    pub kind: TimerKind,
    pub due_ms: u64,
}

#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_token: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn arm(&mut self, kind: TimerKind, due_ms: u64, period_ms: Option<u64>) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.entries.push(Entry {
            token,
            kind,
            due_ms,
            period_ms,
        });
        token
    }

    /// Fire once, `delay_ms` after `now_ms`
    pub fn once(&mut self, kind: TimerKind, now_ms: u64, delay_ms: u64) -> TimerToken {
        self.arm(kind, now_ms + delay_ms, None)
    }

    /// Fire every `period_ms`, starting one period after `now_ms`
    pub fn every(&mut self, kind: TimerKind, now_ms: u64, period_ms: u64) -> TimerToken {
        let period_ms = period_ms.max(1);
        self.arm(kind, now_ms + period_ms, Some(period_ms))
    }

    /// Returns false if the token was not armed
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest timer due at or before `now_ms`. Ties go to the older token.
    /// One-shot timers are disarmed; repeating timers are pushed one period on.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.token))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        let fired = Fired {
            token: entry.token,
            kind: entry.kind,
            due_ms: entry.due_ms,
        };
        let period_ms = entry.period_ms;
        match period_ms {
            Some(period) => entry.due_ms += period,
            None => {
                self.entries.remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_once() {
        let mut timers = Timers::new();
        let token = timers.once(TimerKind::Spawn, 0, 100);
        assert!(timers.pop_due(99).is_none());

        let fired = timers.pop_due(100).unwrap();
        assert_eq!(fired.token, token);
        assert_eq!(fired.due_ms, 100);
        assert!(timers.pop_due(1000).is_none());
        assert!(!timers.is_armed(token));
    }

    #[test]
    fn test_every_repeats() {
        let mut timers = Timers::new();
        timers.every(TimerKind::LevelUp, 0, 20_000);

        let dues: Vec<u64> = std::iter::from_fn(|| timers.pop_due(65_000))
            .map(|f| f.due_ms)
            .collect();
        assert_eq!(dues, vec![20_000, 40_000, 60_000]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut timers = Timers::new();
        let a = timers.once(TimerKind::Spawn, 0, 50);
        let b = timers.every(TimerKind::LevelUp, 0, 30);
        let c = timers.once(TimerKind::Spawn, 20, 30);

        let order: Vec<TimerToken> = std::iter::from_fn(|| timers.pop_due(50))
            .map(|f| f.token)
            .collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let token = timers.every(TimerKind::LevelUp, 0, 10);
        assert!(timers.cancel(token));
        assert!(!timers.cancel(token));
        assert!(timers.pop_due(100).is_none());
        assert!(timers.is_empty());
    }
}
