//! Design Tool Implementations
//!
//! One function per tool, grouped by what they touch: design files on disk,
//! the package installer, and the conversation itself.

pub mod dependency;
pub mod files;
pub mod interaction;

#[cfg(test)]
pub(crate) mod test_helpers;
