//! Target selection and error computation.
//!
//! Everything here is a pure function over immutable inputs. The only state
//! that crosses frames is the `TrackingState` returned by
//! `build_target_state`, which the caller passes back into `select_target`
//! on the next frame.

mod lock_point;
mod offset;
mod select;
mod state;

pub use lock_point::compute_lock_point;
pub use offset::{compute_error, CenterOffset};
pub use select::{select_target, select_target_with_reason, Selection, SelectionReason};
pub use state::{build_target_state, TrackingState};
