mod database {
    pub mod actions;
    pub mod error;
    pub mod form;
    pub mod pagination;
    pub mod schema;
}
mod authentication {
    pub mod session;
}
pub mod config;
mod constants;

pub use authentication::*;
pub use constants::*;
pub use database::*;
