//! lumptex - Decoder for legacy column-oriented image resources
//!
//! This library provides functionality to:
//! - Validate and composite column-oriented patches (run-length "posts")
//! - Decode headerless flats, fullscreen raw images and row-major pictures
//! - Assemble composite textures from patches placed on a shared canvas
//! - Export decoded indexed textures to PNG through a palette
//!
//! The decoder performs no I/O of its own: raw bytes come from a
//! [`resource::RawResourceAccessor`]. Corrupt input never fails a decode; it
//! contributes nothing and is reported as a [`warning::Warning`].

pub mod cli;
pub mod composite;
pub mod config;
pub mod loader;
pub mod output;
pub mod palette;
pub mod patch;
pub mod resource;
pub mod texture;
pub mod translation;
pub mod transpose;
pub mod warning;

pub use loader::{Loader, TextureLoader};
pub use texture::Texture;
pub use warning::Warning;
