mod button;
mod checkbox;
mod dropdown;
mod slider;

pub use button::*;
pub use checkbox::*;
pub use dropdown::*;
pub use slider::*;
