//! View state and its controller
//!
//! The controller owns the single source of truth for what is currently
//! displayed and publishes immutable snapshots on every settled
//! transition; subscribers recompute their rendering from the latest
//! snapshot.

pub mod controller;
pub mod state;

pub use controller::ViewStateController;
pub use state::ViewState;
