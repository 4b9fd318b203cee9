mod color;
mod config;
mod editor;
mod emitter;
mod error;
mod icons;
mod keyboard;
mod memory;
mod options;
mod picker;
mod theme;
mod toolbar;
mod tooltip;

pub use crate::color::*;
pub use crate::config::*;
pub use crate::editor::*;
pub use crate::emitter::*;
pub use crate::error::*;
pub use crate::icons::*;
pub use crate::keyboard::*;
pub use crate::memory::*;
pub use crate::options::*;
pub use crate::picker::*;
pub use crate::theme::*;
pub use crate::toolbar::*;
pub use crate::tooltip::*;
