//! Map-and-list synchronization.
//!
//! A [`MapListSync`] keeps a map surface (viewport, markers, optional route
//! line) and a scrollable card list in step with a shared selection. The map
//! library itself sits behind [`MapBackend`]; [`HeadlessBackend`] records
//! what would be drawn and is what tests and the CLI drive.

pub mod backend;
pub mod config;
pub mod error;
pub mod headless;
pub mod resize;
pub mod surface;
pub mod sync;
pub mod view;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use headless::*;
pub use surface::*;
pub use sync::*;
pub use view::*;
