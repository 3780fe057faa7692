//! Image loading and texture metadata.
//!
//! Source textures are referenced by [`TextureRef`] (name, path and header
//! dimensions) during discovery and grouping; pixel data is only loaded into a
//! [`TextureMap`] when a set is packed.

use crate::Result;
use image::{ImageBuffer, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported image extensions for folder scanning
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga"];

/// Supported image formats for loading
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Tga];

/// A discovered source texture (metadata only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    /// File stem, used for classification and material matching
    pub name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl TextureRef {
    /// Read the image header of `path` and build a reference to it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .ok_or_else(|| crate::Error::Other(format!("Invalid texture name: {}", path.display())))?
            .to_string();

        let (width, height) = image::image_dimensions(path)?;
        Ok(Self {
            name,
            path: path.to_path_buf(),
            width,
            height,
        })
    }

    /// Folder containing the texture.
    pub fn folder(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// A texture with RGBA8 pixel data
#[derive(Debug, Clone)]
pub struct TextureMap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel, row-major)
    pub data: Vec<u8>,
    /// Source path when loaded from file
    pub path: Option<PathBuf>,
}

impl TextureMap {
    /// Texture of `width` x `height` filled with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(pixel_count),
            path: None,
        }
    }

    /// Get pixel at (x, y) as [R, G, B, A]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        if i + 4 > self.data.len() {
            return None;
        }
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn to_image(&self) -> Result<RgbaImage> {
        ImageBuffer::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| crate::Error::Other("Invalid texture dimensions".into()))
    }
}

/// Loads source texture images (PNG, JPG, TGA)
pub struct ImageLoader;

impl ImageLoader {
    /// Load an image from a file path, converting it to RGBA8
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TextureMap> {
        let path = path.as_ref();
        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format().unwrap_or(ImageFormat::Png);

        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(crate::Error::Other(format!(
                "Unsupported format: {:?}. Use PNG, JPG, or TGA.",
                format
            )));
        }

        let rgba = reader.decode()?.to_rgba8();
        Ok(TextureMap {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Load the pixels behind a texture reference
    pub fn load_ref(texture: &TextureRef) -> Result<TextureMap> {
        Self::load(&texture.path)
    }

    /// True when the path has one of the supported image extensions
    pub fn has_image_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}
