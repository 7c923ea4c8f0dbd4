use serde::{Deserialize, Serialize};

/// Point on (or span of) the virtual UI clock, in milliseconds.
///
/// Everything time-driven in the workspace (debounce, delayed scroll, init
/// retries) runs on this clock. The caller advances it explicitly, so runs
/// are replayable.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn after(self, delay: Millis) -> Self {
        Millis(self.0.saturating_add(delay.0))
    }

    pub fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Millis;

    #[test]
    fn after_saturates() {
        assert_eq!(Millis(u64::MAX).after(Millis(1)), Millis(u64::MAX));
        assert_eq!(Millis(100).after(Millis(50)), Millis(150));
    }

    #[test]
    fn since_never_goes_negative() {
        assert_eq!(Millis(10).since(Millis(30)), Millis::ZERO);
        assert_eq!(Millis(30).since(Millis(10)), Millis(20));
    }
}
