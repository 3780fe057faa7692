//! Color channels and semantic map types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four scalar planes of an RGBA image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorChannel {
    R,
    G,
    B,
    A,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 4] = [
        ColorChannel::R,
        ColorChannel::G,
        ColorChannel::B,
        ColorChannel::A,
    ];

    /// Byte offset of this channel inside an RGBA8 pixel.
    pub fn index(self) -> usize {
        match self {
            ColorChannel::R => 0,
            ColorChannel::G => 1,
            ColorChannel::B => 2,
            ColorChannel::A => 3,
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorChannel::R => "R",
            ColorChannel::G => "G",
            ColorChannel::B => "B",
            ColorChannel::A => "A",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ColorChannel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(ColorChannel::R),
            "g" | "green" => Ok(ColorChannel::G),
            "b" | "blue" => Ok(ColorChannel::B),
            "a" | "alpha" => Ok(ColorChannel::A),
            _ => Err(crate::Error::Other(format!(
                "Unknown channel: {}. Use R, G, B, or A.",
                s
            ))),
        }
    }
}

/// Semantic role of a single-channel source texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Metallic,
    Occlusion,
    Roughness,
}

impl MapType {
    /// Classification priority: earlier entries win when a name matches several lists.
    pub const PRIORITY: [MapType; 3] = [MapType::Metallic, MapType::Occlusion, MapType::Roughness];

    pub fn label(&self) -> &'static str {
        match self {
            MapType::Metallic => "metallic",
            MapType::Occlusion => "occlusion",
            MapType::Roughness => "roughness",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_index_matches_rgba_layout() {
        let indices: Vec<_> = ColorChannel::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn channel_parses_short_and_long_names() {
        assert_eq!("r".parse::<ColorChannel>().unwrap(), ColorChannel::R);
        assert_eq!("Alpha".parse::<ColorChannel>().unwrap(), ColorChannel::A);
        assert!("x".parse::<ColorChannel>().is_err());
    }
}
