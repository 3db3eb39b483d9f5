pub mod forest;
pub mod types;

pub use forest::*;
pub use types::*;
