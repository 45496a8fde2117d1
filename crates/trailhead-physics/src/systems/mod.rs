//! Systems run by `PhysicsAdapter::step`, in order: integrate, contacts.
//!
//! Systems are free functions over `&mut World`. They do not own state.

pub mod contacts;
pub mod integrate;
