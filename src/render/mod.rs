pub mod config;
pub mod context;
pub mod formatters;
pub mod members;
pub mod registry;

pub use config::*;
pub use context::*;
pub use formatters::*;
pub use members::*;
pub use registry::*;
