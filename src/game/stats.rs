//! Engine move timing

use std::time::Duration;

/// Running totals for engine replies in the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub moves: u32,
    pub last_think: Option<Duration>,
    pub total_think: Duration,
}

impl EngineStats {
    pub fn record(&mut self, elapsed: Duration) {
        self.moves += 1;
        self.last_think = Some(elapsed);
        self.total_think += elapsed;
    }

    /// Mean time per engine move, if any were made
    pub fn average_think(&self) -> Option<Duration> {
        (self.moves > 0).then(|| self.total_think / self.moves)
    }
}
