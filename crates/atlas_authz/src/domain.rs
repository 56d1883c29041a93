mod location;
mod permission;
mod result;
mod role;
mod subject;

pub use location::*;
pub use permission::*;
pub use result::*;
pub use role::*;
pub use subject::*;
