//! Call bounded context - manages the lifecycle of calls

pub mod aggregate;
pub mod table;
pub mod value_object;

pub use aggregate::{Call, Party};
pub use table::CallSessionTable;
pub use value_object::{CallState, EndReason};
