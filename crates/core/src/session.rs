use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request generations for a single UI session. Each new request
/// supersedes everything before it; a superseded call still runs to
/// completion, but its token no longer passes `is_current` and the consumer
/// must drop the result unapplied. Supersession never cancels the underlying
/// network call.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a new request and returns its token.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the given token still belongs to the newest request.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
