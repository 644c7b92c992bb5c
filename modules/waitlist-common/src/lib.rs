pub mod config;
pub mod email;
pub mod error;
pub mod query;
pub mod types;

pub use config::{Config, Environment, IconLibrary, SiteConfig};
pub use email::validate_email;
pub use error::{MissingConfig, Result, WaitlistError};
pub use types::*;
