//! `SeaORM` entity definitions.

pub mod prelude;

pub mod evaluations;
pub mod files;
pub mod folders;
pub mod users;
