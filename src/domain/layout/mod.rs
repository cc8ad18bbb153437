//! Layout domain - pane visibility coordination for the multi-region UI.

mod pane;

pub use pane::{Milestone, PaneCoordinator, PaneMode, Region};
