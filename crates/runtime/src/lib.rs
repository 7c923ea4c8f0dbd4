pub mod event_bus;
pub mod observable;
pub mod timers;

pub use event_bus::*;
pub use observable::*;
pub use timers::*;
