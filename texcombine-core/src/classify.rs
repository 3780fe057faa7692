//! Texture name classification.
//!
//! A texture name such as `Rock_metal` splits into a texture-set name (`Rock`)
//! and a map type detected from configurable suffix lists.

use crate::channel::{ColorChannel, MapType};
use crate::config::Settings;

/// Separator between the texture-set name and the map suffix
pub const SEPARATOR: char = '_';

/// Derive the texture-set name by truncating at the last separator.
///
/// Names without a separator, or whose only separator is the first character,
/// are returned unchanged.
pub fn texture_set_name(name: &str) -> &str {
    match name.rfind(SEPARATOR) {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

/// Case-insensitive substring check against a suffix list. Empty suffixes never match.
fn contains_any(name_lower: &str, suffixes: &[String]) -> bool {
    suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .any(|s| name_lower.contains(&s.to_lowercase()))
}

/// Classifies texture names into map types and output channels.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    settings: &'a Settings,
}

impl<'a> Classifier<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Detect the map type of a texture name. Metallic is checked first, then
    /// occlusion, then roughness; the first list with a match wins.
    pub fn map_type(&self, name: &str) -> Option<MapType> {
        let lower = name.to_lowercase();
        MapType::PRIORITY
            .into_iter()
            .find(|&map_type| contains_any(&lower, self.settings.suffixes(map_type)))
    }

    pub fn target_channel(&self, map_type: MapType) -> ColorChannel {
        self.settings.target_channel(map_type)
    }

    /// Map type and output channel in one step.
    pub fn classify(&self, name: &str) -> Option<(MapType, ColorChannel)> {
        let map_type = self.map_type(name)?;
        Some((map_type, self.target_channel(map_type)))
    }
}
