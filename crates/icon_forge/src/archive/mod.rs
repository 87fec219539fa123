//! Zip bundling of artifacts

mod bundle;

pub use bundle::*;
