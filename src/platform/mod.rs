//! Platform abstraction layer
//!
//! The simulation never polls devices or reads the wall clock itself. Hosts
//! translate their event loop into these types once per frame:
//! - Time (monotonic seconds)
//! - Input events and held-key state

pub mod clock;
pub mod input;

pub use clock::{Clock, FixedStepClock, MonotonicClock};
pub use input::{InputEvent, Key, KeyState};
