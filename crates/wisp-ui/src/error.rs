use std::fmt;

use crate::control::ControlId;

/// Misuse of the control tree that the caller can recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id refers to a control that was disposed (or never existed in this tree).
    StaleControl(ControlId),
    /// The operation needs the control to be in a collection.
    Detached(ControlId),
    /// The container's root surface cannot be re-parented, removed or disposed.
    RootNotAllowed,
    /// Adding `child` under `parent` would make a control its own ancestor.
    WouldCreateCycle { parent: ControlId, child: ControlId },
    /// `child` is not in `parent`'s collection.
    NotAChild { parent: ControlId, child: ControlId },
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::StaleControl(id) => write!(f, "control {id:?} no longer exists"),
            TreeError::Detached(id) => write!(f, "control {id:?} is not in any collection"),
            TreeError::RootNotAllowed => write!(f, "operation not allowed on the root surface"),
            TreeError::WouldCreateCycle { parent, child } => {
                write!(f, "adding {child:?} under {parent:?} would create a cycle")
            }
            TreeError::NotAChild { parent, child } => {
                write!(f, "{child:?} is not a child of {parent:?}")
            }
            TreeError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for collection of {len}")
            }
        }
    }
}

impl std::error::Error for TreeError {}
