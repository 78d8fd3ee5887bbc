pub mod analysis;
pub mod api;
pub mod format;
pub mod scenario;

pub use analysis::*;
pub use api::*;
pub use scenario::*;
