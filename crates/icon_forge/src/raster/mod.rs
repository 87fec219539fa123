//! Source decoding and square resizing

mod resize;
mod source;

pub use resize::*;
pub use source::*;
