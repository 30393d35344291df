//! Notification record handling
//!
//! Turns raw invocation records into something the reconciler can act on:
//! - origin classification by source field
//! - decoding into the shape that origin promises
//! - resolving the S3 object the record refers to

mod classifier;
mod resolver;

pub use classifier::classify;
pub use resolver::{decode, resolve};
