pub mod from_json;
pub mod types;

pub use from_json::*;
pub use types::*;
