//! Generation tokens for discarding stale asynchronous completions.
//!
//! Every asynchronous operation takes a token from a [`Sequencer`] at the
//! moment it is invoked. When the operation completes, it may only publish
//! its result if its token is still the latest one issued. There is no
//! cancellation: stale results are dropped on arrival.

use std::cell::Cell;

/// Monotonically increasing tag attached to one asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

impl GenerationToken {
    /// Raw sequence number, useful for log fields.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Issues [`GenerationToken`]s and remembers the latest one.
///
/// Single-threaded by construction (`Cell`), matching the cooperative
/// scheduling model of the session.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: Cell<u64>,
}

impl Sequencer {
    /// Create a sequencer that has not issued any token yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every token issued before it.
    pub fn issue(&self) -> GenerationToken {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        GenerationToken(next)
    }

    /// Whether `token` is the most recently issued token.
    #[must_use]
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.latest.get() == token.0
    }

    /// The most recently issued token, if any.
    #[must_use]
    pub fn latest(&self) -> Option<GenerationToken> {
        match self.latest.get() {
            0 => None,
            n => Some(GenerationToken(n)),
        }
    }
}
