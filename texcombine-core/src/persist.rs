//! Writing packed textures to disk.
//!
//! Packed textures are PNG files named `<set>_packed.png` in the folder of the
//! set's source textures. Each one gets an import-settings sidecar marking the
//! data as linear, since the channels hold non-color values.

use crate::grouping::TextureSet;
use crate::image_loading::TextureMap;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Appended to the set name to form the output file stem
pub const PACKED_SUFFIX: &str = "_packed";
pub const PACKED_EXTENSION: &str = "png";
/// Appended to the packed file name to form the sidecar file name
pub const IMPORT_SETTINGS_EXTENSION: &str = "import.json";

/// Import settings written next to a packed texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Whether importers should treat the texture as sRGB color data
    pub srgb: bool,
    /// Source texture per channel (R, G, B, A), `null` where a default was used
    pub sources: [Option<String>; 4],
}

impl ImportSettings {
    pub fn linear_for(set: &TextureSet) -> Self {
        Self {
            srgb: false,
            sources: set.input_names(),
        }
    }
}

/// `<folder>/<set>_packed.png`
pub fn packed_output_path<P: AsRef<Path>>(folder: P, set_name: &str) -> PathBuf {
    folder
        .as_ref()
        .join(format!("{}{}.{}", set_name, PACKED_SUFFIX, PACKED_EXTENSION))
}

/// `<packed file>.import.json`
pub fn import_settings_path<P: AsRef<Path>>(packed: P) -> PathBuf {
    let packed = packed.as_ref();
    let mut name = packed.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(IMPORT_SETTINGS_EXTENSION);
    packed.with_file_name(name)
}

/// Encode `texture` as PNG at `path`.
pub fn write_png<P: AsRef<Path>>(texture: &TextureMap, path: P) -> Result<()> {
    let img = texture.to_image()?;
    img.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    Ok(())
}

pub fn write_import_settings<P: AsRef<Path>>(packed: P, settings: &ImportSettings) -> Result<PathBuf> {
    let path = import_settings_path(packed);
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

pub fn load_import_settings<P: AsRef<Path>>(packed: P) -> Result<ImportSettings> {
    let bytes = std::fs::read(import_settings_path(packed))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn try_save(texture: &TextureMap, set: &TextureSet, with_import_settings: bool) -> Result<PathBuf> {
    let folder = set.folder.as_deref().ok_or_else(|| {
        crate::Error::Other(format!("No folder recorded for texture set {}", set.name))
    })?;
    let path = packed_output_path(folder, &set.name);

    write_png(texture, &path)?;

    if with_import_settings {
        if let Err(e) = write_import_settings(&path, &ImportSettings::linear_for(set)) {
            // No packed texture without its import settings
            if let Err(remove) = std::fs::remove_file(&path) {
                log::warn!("Could not remove {}: {}", path.display(), remove);
            }
            return Err(e);
        }
    }
    log::info!("Packed texture saved to: {}", path.display());
    Ok(path)
}

/// Save the packed texture of `set` next to its sources.
///
/// Failures are logged and yield `None`.
pub fn save_packed(texture: &TextureMap, set: &TextureSet, with_import_settings: bool) -> Option<PathBuf> {
    match try_save(texture, set, with_import_settings) {
        Ok(path) => Some(path),
        Err(e) => {
            log::error!("Could not save packed texture for {}: {}", set.name, e);
            None
        }
    }
}
