//! Copy orchestration
//!
//! [`CopyCoordinator`] drives a run end to end, [`CaseSender`] submits the
//! classified cases and [`CopySummary`] reports what happened.

pub mod coordinator;
pub mod sender;
pub mod summary;

pub use coordinator::CopyCoordinator;
pub use sender::{group_by_outbreak, CaseSender};
pub use summary::CopySummary;
