//! Output file naming.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// Extension of every generated file.
pub const GENERATED_EXTENSION: &str = "g.cs";

/// Hands out unique file names for one generation run.
///
/// The first builder called `OrderBuilder` receives `OrderBuilder.g.cs`;
/// later claims of the same name receive `OrderBuilder.<n>.g.cs`, where `n`
/// comes from a counter shared by the whole run. The allocator is owned by
/// the run, so separate runs never observe each other's names.
#[derive(Debug, Default)]
pub struct FileNameAllocator {
    counter: AtomicUsize,
    claimed: Mutex<HashSet<String>>,
}

impl FileNameAllocator {
    /// Create an allocator with no names claimed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a file name for `builder_name`.
    #[must_use]
    pub fn allocate(&self, builder_name: &str) -> String {
        let mut claimed = self.claimed.lock();
        let preferred = format!("{builder_name}.{GENERATED_EXTENSION}");
        if claimed.insert(preferred.clone()) {
            return preferred;
        }
        loop {
            let sequence = self.counter.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            let candidate = format!("{builder_name}.{sequence}.{GENERATED_EXTENSION}");
            if claimed.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Number of names handed out so far.
    #[must_use]
    pub fn claimed(&self) -> usize {
        self.claimed.lock().len()
    }
}
