use std::fmt;

/// Persistence for the best score across sessions.
///
/// The engine only reads the value once when a session starts and writes it when a
/// new best is reached. Storage failures are the implementor's concern; the engine
/// keeps playing either way.
pub trait BestScoreStore: fmt::Debug {
    /// Returns the stored best score, or 0 when nothing is stored.
    fn load(&self) -> u64;

    fn store(&mut self, best_score: u64);
}

/// A [`BestScoreStore`] that lives only as long as the value itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryBestScore {
    best_score: u64,
}

impl MemoryBestScore {
    #[must_use]
    pub const fn new(best_score: u64) -> Self {
        Self { best_score }
    }
}

impl BestScoreStore for MemoryBestScore {
    fn load(&self) -> u64 {
        self.best_score
    }

    fn store(&mut self, best_score: u64) {
        self.best_score = best_score;
    }
}

/// Cached best score backed by a store.
#[derive(Debug)]
pub(crate) struct BestScore {
    value: u64,
    store: Box<dyn BestScoreStore>,
}

impl BestScore {
    pub(crate) fn new(store: Box<dyn BestScoreStore>) -> Self {
        let value = store.load();
        Self { value, store }
    }

    pub(crate) const fn value(&self) -> u64 {
        self.value
    }

    /// Records `score`; persists and returns true when it beats the best.
    pub(crate) fn observe(&mut self, score: u64) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        self.store.store(score);
        true
    }
}
