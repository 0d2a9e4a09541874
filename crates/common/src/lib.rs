//! Pieces shared by the service and server crates: wire types, startup
//! environment checks and tracing initialisation.

pub mod types;
pub mod utils;
pub mod env;
