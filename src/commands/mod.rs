//! Command implementations

mod policy_cmd;
mod scan;
mod serve;

pub use policy_cmd::policy_cmd;
pub use scan::scan;
pub use serve::serve;
