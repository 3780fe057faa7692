//! Channel packing.
//!
//! Copies one channel of up to four source textures into the R, G, B and A
//! channels of a single output texture. Channels without a source are filled
//! with a constant fallback value.

use crate::channel::ColorChannel;
use crate::config::Settings;
use crate::grouping::TextureSet;
use crate::image_loading::{ImageLoader, TextureMap};
use crate::Result;
use image::imageops::FilterType;

/// Per-output-channel packing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PackOptions {
    /// Fallback value (0..=1) for channels without a source
    pub defaults: [f32; 4],
    /// Scale applied to source values after inversion
    pub multipliers: [f32; 4],
    /// Invert source values (v -> 1 - v)
    pub inverts: [bool; 4],
    /// Channel read from each source
    pub source_channels: [ColorChannel; 4],
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            defaults: [0.0, 1.0, 0.0, 1.0],
            multipliers: [1.0; 4],
            inverts: [false; 4],
            source_channels: [ColorChannel::R; 4],
        }
    }
}

impl From<&Settings> for PackOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            defaults: settings.defaults,
            multipliers: settings.multipliers,
            inverts: settings.inverts,
            source_channels: settings.source_channels,
        }
    }
}

/// Convert a 0..=1 value to an 8-bit channel value.
#[inline]
pub fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Applies inversion and multiplier to a source byte. Neutral settings return it unchanged.
#[inline]
fn remap(value: u8, invert: bool, multiplier: f32) -> u8 {
    if !invert && multiplier == 1.0 {
        return value;
    }
    let mut v = value as f32 / 255.0;
    if invert {
        v = 1.0 - v;
    }
    quantize(v * multiplier)
}

/// Resizes a texture to exact dimensions using Lanczos3.
fn resize_to_exact(texture: &TextureMap, width: u32, height: u32) -> Result<TextureMap> {
    let img = texture.to_image()?;
    let resized = image::imageops::resize(&img, width, height, FilterType::Lanczos3);

    Ok(TextureMap {
        width,
        height,
        data: resized.into_raw(),
        path: texture.path.clone(),
    })
}

/// Packs up to four sources into one RGBA texture of `width` x `height`.
///
/// `inputs` is indexed by output channel. A source whose dimensions differ from
/// the output is resized first.
pub fn pack_channels(
    width: u32,
    height: u32,
    inputs: [Option<&TextureMap>; 4],
    options: &PackOptions,
) -> Result<TextureMap> {
    if width == 0 || height == 0 {
        return Err(crate::Error::Other("Cannot pack an empty texture".into()));
    }

    let fill = options.defaults.map(quantize);
    let mut packed = TextureMap::filled(width, height, fill);

    for (out, input) in inputs.into_iter().enumerate() {
        let Some(source) = input else {
            continue;
        };

        let resized;
        let source = if source.width != width || source.height != height {
            log::warn!(
                "Resizing {} from {}x{} to {}x{}",
                source
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "source".into()),
                source.width,
                source.height,
                width,
                height
            );
            resized = resize_to_exact(source, width, height)?;
            &resized
        } else {
            source
        };

        if source.data.len() != packed.data.len() {
            return Err(crate::Error::Other("Invalid texture dimensions".into()));
        }

        let from = options.source_channels[out].index();
        let invert = options.inverts[out];
        let multiplier = options.multipliers[out];
        for (dst, src) in packed
            .data
            .chunks_exact_mut(4)
            .zip(source.data.chunks_exact(4))
        {
            dst[out] = remap(src[from], invert, multiplier);
        }
    }

    Ok(packed)
}

/// Loads the inputs of `set` and packs them at the set's recorded dimensions.
///
/// Returns `Ok(None)` when the set never received a texture.
pub fn pack_set(set: &TextureSet, options: &PackOptions) -> Result<Option<TextureMap>> {
    let Some((width, height)) = set.dimensions else {
        return Ok(None);
    };

    let mut loaded: [Option<TextureMap>; 4] = Default::default();
    for (slot, input) in loaded.iter_mut().zip(set.inputs.iter()) {
        if let Some(texture) = input {
            *slot = Some(ImageLoader::load_ref(texture)?);
        }
    }

    let packed = pack_channels(width, height, loaded.each_ref().map(Option::as_ref), options)?;
    Ok(Some(packed))
}
