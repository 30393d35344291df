//! Core types for Clamtag

mod notification;
mod object;
mod scan;

pub use notification::*;
pub use object::*;
pub use scan::*;
