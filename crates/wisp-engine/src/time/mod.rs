//! Time subsystem.
//!
//! Testable timing utilities without coupling to a platform loop:
//! - one `TickClock` per message pump, `tick()` once per iteration
//! - one `IntervalTimer` per native timer id

mod clock;
mod timer;

pub use clock::{Tick, TickClock};
pub use timer::IntervalTimer;
