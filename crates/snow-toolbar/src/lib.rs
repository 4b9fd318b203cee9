pub mod assets;
mod button;
mod icon;
mod picker;
mod toolbar;
mod tooltip;

pub use crate::button::*;
pub use crate::icon::*;
pub use crate::picker::*;
pub use crate::toolbar::*;
pub use crate::tooltip::*;
