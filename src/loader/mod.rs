//! Content loaders
//!
//! Parser for the .pairs game format and a directory-backed library

pub mod content;
pub mod library;

pub use content::{slugify, ContentLoader};
pub use library::ContentLibrary;
