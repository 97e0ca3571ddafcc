//! Command implementations.

pub mod predict;
pub mod status;

pub use self::predict::execute_predict;
pub use self::status::execute_status;
