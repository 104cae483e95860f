//! Users, folders and file records.
//!
//! Files are recorded when an upload is requested; the bytes themselves go
//! through whatever target the transfer broker hands back.

mod error;
mod service;
mod types;

pub use error::PortfolioError;
pub use service::{PortfolioRepository, PortfolioService};
pub use types::{
    FileRecord, Folder, NewFileRecord, NewFolder, NewUser, RequestUploadInput, Role, UploadGrant,
    User,
};
