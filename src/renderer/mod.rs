pub mod components;
pub mod output;
pub mod renderer;
pub mod renders;
pub mod traits;
pub mod xref;

pub use components::*;
pub use output::*;
pub use renderer::*;
pub use traits::*;
pub use xref::*;
