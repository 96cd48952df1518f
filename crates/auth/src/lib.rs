//! `tallyworks-auth` — users and feature-group membership.

pub mod group;
pub mod user;

pub use group::Group;
pub use user::User;
