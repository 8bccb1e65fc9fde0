//! Small concrete controls built on the framework.
//!
//! Each widget is a builder that creates one control in a [`ControlTree`]
//! and wires its behaviour through ordinary event subscriptions, so the
//! framework treats it like any other control.
//!
//! [`ControlTree`]: crate::tree::ControlTree

pub mod button;
pub mod label;
pub mod stack;

pub use button::PushButton;
pub use label::Label;
pub use stack::StackPanel;
