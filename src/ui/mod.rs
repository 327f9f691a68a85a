mod event;
pub mod host;

pub use event::*;
pub use host::*;
