/// Handle for one consumer of an [`Observable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// A single shared value with publish-on-write semantics.
///
/// Every `set` bumps a version. Each subscriber remembers the last version it
/// consumed, so consumers are decoupled: each one takes changes at its own
/// pace and only ever sees the latest value (last write wins).
#[derive(Debug, Clone)]
pub struct Observable<T> {
    value: T,
    version: u64,
    seen: Vec<u64>,
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            version: 0,
            seen: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Publishes a new value and returns its version.
    pub fn set(&mut self, value: T) -> u64 {
        self.value = value;
        self.version += 1;
        self.version
    }

    /// Registers a consumer. Writes made before subscribing are not reported.
    pub fn subscribe(&mut self) -> SubscriberId {
        self.seen.push(self.version);
        SubscriberId(self.seen.len() - 1)
    }

    pub fn has_change(&self, sub: SubscriberId) -> bool {
        self.seen
            .get(sub.0)
            .is_some_and(|seen| *seen < self.version)
    }

    /// Returns the current value if it changed since this subscriber last looked.
    pub fn take_change(&mut self, sub: SubscriberId) -> Option<&T> {
        let seen = self.seen.get_mut(sub.0)?;
        if *seen >= self.version {
            return None;
        }
        *seen = self.version;
        Some(&self.value)
    }
}
