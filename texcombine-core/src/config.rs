//! Batch settings (TOML).
//!
//! Every field has a default, so a settings file only needs the keys it changes.

use crate::channel::{ColorChannel, MapType};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default property slot that receives the packed texture on rebound materials.
pub const DEFAULT_SHADER_PROPERTY: &str = "_MetOccRoughMap";

/// Settings for one combine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folders searched for source textures
    pub texture_folders: Vec<PathBuf>,
    /// Folders searched for `.mat` material files
    pub material_folders: Vec<PathBuf>,
    pub metallic_suffixes: Vec<String>,
    pub occlusion_suffixes: Vec<String>,
    pub roughness_suffixes: Vec<String>,
    pub metallic_channel: ColorChannel,
    pub occlusion_channel: ColorChannel,
    pub roughness_channel: ColorChannel,
    /// Fallback value (0..=1) per output channel when no source supplies it
    pub defaults: [f32; 4],
    pub multipliers: [f32; 4],
    pub inverts: [bool; 4],
    /// Channel read from each source texture, per output channel
    pub source_channels: [ColorChannel; 4],
    /// Shader assigned to rebound materials; `None` keeps the material's shader
    pub shader: Option<String>,
    pub shader_property: String,
    /// Write `<file>.import.json` next to each packed texture
    pub write_import_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            texture_folders: vec![PathBuf::from("assets/maps")],
            material_folders: vec![PathBuf::from("assets/materials")],
            metallic_suffixes: vec!["_metal".into()],
            occlusion_suffixes: vec!["_AmbientOcclusion".into(), "_AO".into()],
            roughness_suffixes: vec!["_rough".into()],
            metallic_channel: ColorChannel::R,
            occlusion_channel: ColorChannel::G,
            roughness_channel: ColorChannel::B,
            // Occlusion and alpha fall back to white
            defaults: [0.0, 1.0, 0.0, 1.0],
            multipliers: [1.0; 4],
            inverts: [false; 4],
            source_channels: [ColorChannel::R; 4],
            shader: None,
            shader_property: DEFAULT_SHADER_PROPERTY.to_string(),
            write_import_settings: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Other(format!("Could not serialize settings: {}", e)))
    }

    pub fn suffixes(&self, map_type: MapType) -> &[String] {
        match map_type {
            MapType::Metallic => &self.metallic_suffixes,
            MapType::Occlusion => &self.occlusion_suffixes,
            MapType::Roughness => &self.roughness_suffixes,
        }
    }

    pub fn target_channel(&self, map_type: MapType) -> ColorChannel {
        match map_type {
            MapType::Metallic => self.metallic_channel,
            MapType::Occlusion => self.occlusion_channel,
            MapType::Roughness => self.roughness_channel,
        }
    }
}
