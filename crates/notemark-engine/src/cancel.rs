use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ParseError, ParseResult};

/// Shared flag that stops a parse between blocks and paragraphs.
///
/// Clones share the flag, so a caller can keep one and hand the other to a
/// parse running on a worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(ParseError::Cancelled)` once [`cancel`](Self::cancel) was called.
    pub fn check(&self) -> ParseResult<()> {
        if self.is_cancelled() {
            Err(ParseError::Cancelled)
        } else {
            Ok(())
        }
    }
}
