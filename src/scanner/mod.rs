//! Tree sweep: walker, entry filter, action dispatch, delete and archive actions.

pub mod archive;
pub mod deletion;
pub mod dispatch;
pub mod filter;
pub mod walker;
