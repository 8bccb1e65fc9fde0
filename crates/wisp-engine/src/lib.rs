//! Wisp engine crate.
//!
//! Platform-agnostic pieces shared by the control framework and whatever
//! binds it to a real windowing system: geometry, translated window messages,
//! the recorded draw stream, timers and logging setup.

pub mod coords;
pub mod input;
pub mod logging;
pub mod scene;
pub mod time;
