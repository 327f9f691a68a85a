mod color;
mod theme;

pub use color::*;
pub use theme::*;
