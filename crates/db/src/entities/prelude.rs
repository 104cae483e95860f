//! Entity re-exports.

pub use super::evaluations::Entity as Evaluations;
pub use super::files::Entity as Files;
pub use super::folders::Entity as Folders;
pub use super::users::Entity as Users;
