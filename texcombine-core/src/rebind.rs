//! Material rebinding.
//!
//! Materials are JSON files with a `.mat` extension:
//!
//! ```json
//! {
//!   "shader": "Standard",
//!   "textures": { "_MainTex": "maps/Wood_albedo.png" }
//! }
//! ```
//!
//! A material that references a texture of a packed set gets the replacement
//! shader and the packed texture in the configured property slot.

use crate::grouping::TextureSet;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const MATERIAL_EXTENSION: &str = "mat";

/// A material descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shader: String,
    /// Texture property name -> texture path, `null` for an unbound slot
    #[serde(default)]
    pub textures: BTreeMap<String, Option<String>>,
    /// Keys this tool does not interpret, preserved on save
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Texture name (file stem) of a texture path as stored in a material.
pub fn texture_name(texture_path: &str) -> &str {
    Path::new(texture_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(texture_path)
}

impl Material {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// First bound texture slot whose texture name contains `set_name`.
    pub fn find_matching_slot(&self, set_name: &str) -> Option<(&str, &str)> {
        self.textures
            .iter()
            .filter_map(|(slot, texture)| Some((slot.as_str(), texture.as_deref()?)))
            .find(|(_, texture)| texture_name(texture).contains(set_name))
    }
}

fn collect_materials(folder: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_materials(&path, out)?;
        } else if path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(MATERIAL_EXTENSION)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// All material files under `folders`, sorted. Unreadable folders are skipped with a warning.
pub fn find_materials(folders: &[PathBuf]) -> Vec<PathBuf> {
    let mut materials = Vec::new();
    for folder in folders {
        if let Err(e) = collect_materials(folder, &mut materials) {
            log::warn!("Skipping material folder {}: {}", folder.display(), e);
        }
    }
    materials.sort();
    materials.dedup();
    materials
}

/// Points materials at packed textures.
#[derive(Debug, Clone)]
pub struct Rebinder {
    material_folders: Vec<PathBuf>,
    shader: Option<String>,
    property: String,
}

impl Rebinder {
    pub fn new(material_folders: Vec<PathBuf>, shader: Option<String>, property: impl Into<String>) -> Self {
        Self {
            material_folders,
            shader,
            property: property.into(),
        }
    }

    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self::new(
            settings.material_folders.clone(),
            settings.shader.clone(),
            settings.shader_property.clone(),
        )
    }

    /// Apply the shader swap and packed texture to one material. Returns true when it matched.
    pub fn apply(&self, material: &mut Material, packed: &Path, set: &TextureSet) -> bool {
        let Some((slot, texture)) = material.find_matching_slot(&set.name) else {
            return false;
        };
        log::info!("Processing: {} ({})", texture_name(texture), slot);

        if let Some(shader) = &self.shader {
            material.shader = shader.clone();
        }
        material
            .textures
            .insert(self.property.clone(), Some(packed.to_string_lossy().into_owned()));
        true
    }

    fn rebind_one(&self, path: &Path, packed: &Path, set: &TextureSet) -> Result<bool> {
        let mut material = Material::load(path)?;
        if !self.apply(&mut material, packed, set) {
            return Ok(false);
        }
        material.save(path)?;
        Ok(true)
    }

    /// Rebind every matching material to `packed`. Returns the materials written.
    ///
    /// Each material is handled independently; failures are logged and skipped.
    pub fn rebind(&self, packed: &Path, set: &TextureSet) -> Vec<PathBuf> {
        if self.shader.is_none() {
            log::warn!("No replacement shader configured, keeping material shaders");
        }

        let mut updated = Vec::new();
        for path in find_materials(&self.material_folders) {
            match self.rebind_one(&path, packed, set) {
                Ok(true) => {
                    log::info!("Assigned packed texture to: {} material", path.display());
                    updated.push(path);
                }
                Ok(false) => {}
                Err(e) => log::warn!("Skipping material {}: {}", path.display(), e),
            }
        }
        updated
    }
}
