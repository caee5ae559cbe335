//! JSON API handlers, grouped by resource.

pub mod accounts;
pub mod faculty;
pub mod proposals;
pub mod slots;
