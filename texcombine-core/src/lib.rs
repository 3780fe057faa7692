//! # texcombine core
//!
//! Batch packing of single-channel texture maps (metallic, occlusion,
//! roughness) into the RGBA channels of one texture, and rebinding of the
//! materials that use them.
//!
//! ## Architecture
//!
//! - [`discovery`] - Finding source textures in folders
//! - [`classify`] - Texture-set names and map types from file names
//! - [`grouping`] - Collecting classified textures into texture sets
//! - [`pack`] - Channel packing
//! - [`persist`] - Writing packed textures and import settings
//! - [`rebind`] - Pointing materials at packed textures
//! - [`pipeline`] - The whole pass, per folder or per texture list

pub mod channel;
pub mod classify;
pub mod config;
pub mod discovery;
pub mod grouping;
pub mod image_loading;
pub mod pack;
pub mod persist;
pub mod pipeline;
pub mod rebind;
pub mod report;

// Re-export main types for convenient access
pub use channel::{ColorChannel, MapType};
pub use classify::{texture_set_name, Classifier};
pub use config::Settings;
pub use discovery::discover_textures;
pub use grouping::{group_textures, Grouper, TextureSet};
pub use image_loading::{ImageLoader, TextureMap, TextureRef};
pub use pack::{pack_channels, pack_set, PackOptions};
pub use persist::{packed_output_path, save_packed, ImportSettings};
pub use pipeline::Pipeline;
pub use rebind::{find_materials, Material, Rebinder};
pub use report::{RunReport, SetReport};

/// Common result type for texcombine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Nothing to process; the run is aborted before any work
    #[error("{0}")]
    NoInputs(String),

    #[error("{0}")]
    Other(String),
}
