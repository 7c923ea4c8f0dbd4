use foundation::time::Millis;
use serde::Serialize;

/// An event together with the virtual time it was emitted at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stamped<E> {
    pub at: Millis,
    pub event: E,
}

/// Append-only notification log.
///
/// Producers push typed events; the embedding shell reads or drains them.
/// Nothing is dispatched synchronously, so a slow or broken consumer can
/// never stall the producer.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Millis, event: E) {
        self.events.push(Stamped { at, event });
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Millis;

    #[test]
    fn records_events_with_time() {
        let mut bus = EventBus::new();
        bus.emit(Millis(20), "hello");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].at, Millis(20));
        assert_eq!(bus.events()[0].event, "hello");
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Millis(0), 1u32);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
