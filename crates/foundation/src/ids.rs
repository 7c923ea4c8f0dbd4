use serde::{Deserialize, Serialize};

/// Opaque numeric id handed out by an [`IdAllocator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Id(u64);

impl Id {
    pub fn new(n: u64) -> Self {
        Id(n)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Monotonic id source. Ids are never reused within one allocator.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> Id {
        let id = Id(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
