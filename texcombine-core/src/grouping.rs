//! Grouping of classified textures into texture sets.

use crate::channel::ColorChannel;
use crate::classify::{texture_set_name, Classifier};
use crate::image_loading::TextureRef;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source textures sharing one base name, packed into a single output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureSet {
    pub name: String,
    /// Folder of the first texture assigned; the packed output is written here
    pub folder: Option<PathBuf>,
    /// Width and height of the first texture assigned
    pub dimensions: Option<(u32, u32)>,
    /// Source per output channel, indexed R, G, B, A
    pub inputs: [Option<TextureRef>; 4],
}

impl TextureSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn input(&self, channel: ColorChannel) -> Option<&TextureRef> {
        self.inputs[channel.index()].as_ref()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.iter().filter(|i| i.is_some()).count()
    }

    /// Assign `texture` to `channel`. Returns false when the slot is already taken.
    pub fn assign(&mut self, channel: ColorChannel, texture: TextureRef) -> bool {
        let slot = &mut self.inputs[channel.index()];
        if slot.is_some() {
            return false;
        }
        if self.dimensions.is_none() {
            self.dimensions = Some((texture.width, texture.height));
        }
        if self.folder.is_none() {
            self.folder = texture.folder().map(|f| f.to_path_buf());
        }
        *slot = Some(texture);
        true
    }

    /// Names of the source textures per channel, for reports.
    pub fn input_names(&self) -> [Option<String>; 4] {
        self.inputs
            .each_ref()
            .map(|i| i.as_ref().map(|t| t.name.clone()))
    }
}

/// Accumulates classified textures into texture sets, in order of first appearance.
pub struct Grouper<'a> {
    classifier: Classifier<'a>,
    sets: Vec<TextureSet>,
    /// Name of the set the previous texture belonged to
    active_name: Option<String>,
    /// Index into `sets` of the active set, once it holds a texture
    active: Option<usize>,
}

impl<'a> Grouper<'a> {
    pub fn new(classifier: Classifier<'a>) -> Self {
        Self {
            classifier,
            sets: Vec::new(),
            active_name: None,
            active: None,
        }
    }

    /// Classify `texture` and add it to its set.
    ///
    /// Returns the index of the set that received the texture, or `None` when the
    /// name matches no suffix or the target channel was already filled.
    pub fn add(&mut self, texture: TextureRef) -> Option<usize> {
        let set_name = texture_set_name(&texture.name).to_string();

        if self.active_name.as_deref() != Some(set_name.as_str()) {
            self.active = self.sets.iter().position(|s| s.name == set_name);
            self.active_name = Some(set_name.clone());
        }

        let Some((map_type, channel)) = self.classifier.classify(&texture.name) else {
            log::debug!("{}: no map suffix, skipped", texture.name);
            return None;
        };

        let index = match self.active {
            Some(index) => index,
            None => {
                self.sets.push(TextureSet::new(set_name));
                let index = self.sets.len() - 1;
                self.active = Some(index);
                index
            }
        };

        let set = &mut self.sets[index];
        let texture_name = texture.name.clone();
        if !set.assign(channel, texture) {
            log::warn!(
                "{}: channel {} of set {} already filled, {} ignored",
                texture_name,
                channel,
                set.name,
                map_type.label()
            );
            return None;
        }
        log::debug!("{}: {} -> {}.{}", texture_name, map_type.label(), set.name, channel);
        Some(index)
    }

    pub fn finish(self) -> Vec<TextureSet> {
        self.sets
    }
}

/// Group a list of textures in order.
pub fn group_textures<I>(classifier: Classifier<'_>, textures: I) -> Vec<TextureSet>
where
    I: IntoIterator<Item = TextureRef>,
{
    let mut grouper = Grouper::new(classifier);
    for texture in textures {
        grouper.add(texture);
    }
    grouper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn tex(name: &str, size: u32) -> TextureRef {
        TextureRef {
            name: name.to_string(),
            path: PathBuf::from("maps").join(format!("{}.png", name)),
            width: size,
            height: size,
        }
    }

    #[test]
    fn groups_by_set_name_into_configured_channels() {
        let settings = Settings::default();
        let sets = group_textures(
            Classifier::new(&settings),
            vec![tex("Wood_AO", 4), tex("Wood_metal", 4), tex("Wood_rough", 4)],
        );

        assert_eq!(sets.len(), 1);
        let wood = &sets[0];
        assert_eq!(wood.name, "Wood");
        assert_eq!(wood.dimensions, Some((4, 4)));
        assert_eq!(wood.folder, Some(PathBuf::from("maps")));
        assert_eq!(wood.input(ColorChannel::R).unwrap().name, "Wood_metal");
        assert_eq!(wood.input(ColorChannel::G).unwrap().name, "Wood_AO");
        assert_eq!(wood.input(ColorChannel::B).unwrap().name, "Wood_rough");
        assert!(wood.input(ColorChannel::A).is_none());
    }

    #[test]
    fn distinct_sets_do_not_share_inputs() {
        let settings = Settings::default();
        let sets = group_textures(
            Classifier::new(&settings),
            vec![tex("Rock_metal", 8), tex("Wood_metal", 4), tex("Wood_AO", 4)],
        );

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "Rock");
        assert_eq!(sets[0].input_count(), 1);
        assert_eq!(sets[0].dimensions, Some((8, 8)));
        assert_eq!(sets[0].input(ColorChannel::R).unwrap().name, "Rock_metal");

        assert_eq!(sets[1].name, "Wood");
        assert_eq!(sets[1].input_count(), 2);
        assert_eq!(sets[1].input(ColorChannel::R).unwrap().name, "Wood_metal");
    }

    #[test]
    fn unclassified_textures_create_no_set() {
        let settings = Settings::default();
        let sets = group_textures(
            Classifier::new(&settings),
            vec![tex("Stone_albedo", 4), tex("Stone_normal", 4)],
        );
        assert!(sets.is_empty());
    }

    #[test]
    fn interleaved_names_resume_existing_set() {
        let settings = Settings::default();
        let sets = group_textures(
            Classifier::new(&settings),
            vec![tex("Wood_metal", 4), tex("Rock_AO", 2), tex("Wood_rough", 4)],
        );

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "Wood");
        assert_eq!(sets[0].input_count(), 2);
        assert_eq!(sets[1].name, "Rock");
    }

    #[test]
    fn occupied_channel_keeps_first_texture() {
        let settings = Settings::default();
        let mut grouper = Grouper::new(Classifier::new(&settings));

        assert_eq!(grouper.add(tex("Wood_AO", 4)), Some(0));
        assert_eq!(grouper.add(tex("Wood_AmbientOcclusion", 4)), None);

        let sets = grouper.finish();
        assert_eq!(sets[0].input(ColorChannel::G).unwrap().name, "Wood_AO");
    }

    #[test]
    fn dimensions_come_from_first_texture() {
        let settings = Settings::default();
        let sets = group_textures(
            Classifier::new(&settings),
            vec![tex("Wood_metal", 16), tex("Wood_rough", 4)],
        );
        assert_eq!(sets[0].dimensions, Some((16, 16)));
    }
}
