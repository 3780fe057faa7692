//! Run reports.
//!
//! Summarizes what a combine run produced, for text or JSON output.

use crate::grouping::TextureSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one texture set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetReport {
    pub name: String,
    pub folder: Option<PathBuf>,
    pub dimensions: Option<(u32, u32)>,
    /// Source texture name per output channel (R, G, B, A)
    pub channels: [Option<String>; 4],
    /// Written packed texture, `None` when nothing was saved
    pub output: Option<PathBuf>,
    /// Materials rebound to the packed texture
    pub materials: Vec<PathBuf>,
}

impl SetReport {
    pub fn from_set(set: &TextureSet) -> Self {
        Self {
            name: set.name.clone(),
            folder: set.folder.clone(),
            dimensions: set.dimensions,
            channels: set.input_names(),
            output: None,
            materials: Vec::new(),
        }
    }
}

/// Summary of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub sets: Vec<SetReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            sets: Vec::new(),
        }
    }

    pub fn packed_count(&self) -> usize {
        self.sets.iter().filter(|s| s.output.is_some()).count()
    }

    pub fn material_count(&self) -> usize {
        self.sets.iter().map(|s| s.materials.len()).sum()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary, one block per set.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for set in &self.sets {
            let dims = set
                .dimensions
                .map(|(w, h)| format!("{}x{}", w, h))
                .unwrap_or_else(|| "-".into());
            lines.push(format!("{} ({})", set.name, dims));
            for (label, source) in ["R", "G", "B", "A"].iter().zip(&set.channels) {
                lines.push(format!(
                    "  {}: {}",
                    label,
                    source.as_deref().unwrap_or("(default)")
                ));
            }
            if let Some(output) = &set.output {
                lines.push(format!("  -> {}", output.display()));
            }
            for material in &set.materials {
                lines.push(format!("  material: {}", material.display()));
            }
        }
        lines.push(format!(
            "{} set(s), {} packed, {} material(s) updated",
            self.sets.len(),
            self.packed_count(),
            self.material_count()
        ));
        lines.join("\n")
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
