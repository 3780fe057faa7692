//! The combine pipeline: discover, group, pack, save, rebind.

use crate::classify::Classifier;
use crate::config::Settings;
use crate::discovery::discover_textures;
use crate::grouping::{group_textures, TextureSet};
use crate::image_loading::TextureRef;
use crate::pack::{pack_set, PackOptions};
use crate::persist::save_packed;
use crate::rebind::Rebinder;
use crate::report::{RunReport, SetReport};
use crate::Result;
use std::path::{Path, PathBuf};

/// Runs combine passes with one set of settings.
pub struct Pipeline {
    settings: Settings,
    options: PackOptions,
    rebinder: Rebinder,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        let options = PackOptions::from(&settings);
        let rebinder = Rebinder::from_settings(&settings);
        Self {
            settings,
            options,
            rebinder,
        }
    }

    /// Discover and group the textures of one folder without writing anything.
    pub fn group_folder<P: AsRef<Path>>(&self, folder: P) -> Result<Vec<TextureSet>> {
        let textures = discover_textures(folder)?;
        Ok(group_textures(Classifier::new(&self.settings), textures))
    }

    /// Group textures of each folder, skipping empty and unreadable entries.
    fn grouped_folders<'p>(
        &self,
        folders: &'p [PathBuf],
    ) -> Result<Vec<(&'p Path, Vec<TextureSet>)>> {
        if folders.is_empty() {
            return Err(crate::Error::NoInputs(
                "Please provide at least one folder path".into(),
            ));
        }

        let mut grouped = Vec::new();
        for folder in folders {
            if folder.as_os_str().is_empty() {
                log::warn!("Empty folder path");
                continue;
            }
            match self.group_folder(folder) {
                Ok(sets) => grouped.push((folder.as_path(), sets)),
                Err(e) => log::warn!("Skipping folder {}: {}", folder.display(), e),
            }
        }
        Ok(grouped)
    }

    /// Dry run: the texture sets each folder would produce.
    pub fn plan_folders(&self, folders: &[PathBuf]) -> Result<Vec<TextureSet>> {
        Ok(self
            .grouped_folders(folders)?
            .into_iter()
            .flat_map(|(_, sets)| sets)
            .collect())
    }

    /// Process every folder independently: each folder's sets are packed once.
    pub fn process_folders(&self, folders: &[PathBuf]) -> Result<RunReport> {
        let mut report = RunReport::new();
        for (folder, sets) in self.grouped_folders(folders)? {
            log::info!("{}: {} texture set(s)", folder.display(), sets.len());
            for set in &sets {
                report.sets.push(self.process_set(set));
            }
        }
        Ok(report)
    }

    /// Process an explicit list of textures; all sets are packed at the end.
    pub fn process_textures(&self, paths: &[PathBuf]) -> Result<RunReport> {
        if paths.is_empty() {
            return Err(crate::Error::NoInputs("Please provide textures".into()));
        }

        let textures = paths.iter().filter_map(|path| match TextureRef::open(path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("Skipping texture {}: {}", path.display(), e);
                None
            }
        });
        let sets = group_textures(Classifier::new(&self.settings), textures);

        let mut report = RunReport::new();
        for set in &sets {
            report.sets.push(self.process_set(set));
        }
        Ok(report)
    }

    /// Pack, save and rebind one set. Failures are logged and leave the report entry empty.
    pub fn process_set(&self, set: &TextureSet) -> SetReport {
        let mut report = SetReport::from_set(set);

        let packed = match pack_set(set, &self.options) {
            Ok(Some(packed)) => packed,
            Ok(None) => return report,
            Err(e) => {
                log::error!("Could not pack texture set {}: {}", set.name, e);
                return report;
            }
        };

        let Some(path) = save_packed(&packed, set, self.settings.write_import_settings) else {
            return report;
        };
        report.materials = self.rebinder.rebind(&path, set);
        report.output = Some(path);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_loading::ImageLoader;
    use crate::persist::load_import_settings;
    use crate::rebind::Material;
    use std::collections::BTreeMap;

    fn save_gray(path: &Path, size: u32, value: u8) {
        image::GrayImage::from_pixel(size, size, image::Luma([value]))
            .save(path)
            .unwrap();
    }

    fn write_material(path: &Path, textures: &[(&str, &str)]) {
        Material {
            shader: "Standard".into(),
            textures: textures
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            extra: BTreeMap::new(),
        }
        .save(path)
        .unwrap();
    }

    fn settings_for(materials: &Path) -> Settings {
        Settings {
            material_folders: vec![materials.to_path_buf()],
            shader: Some("Custom/PackedLit".into()),
            ..Default::default()
        }
    }

    #[test]
    fn wood_folder_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let maps = tmp.path().join("maps");
        let materials = tmp.path().join("materials");
        std::fs::create_dir_all(&maps).unwrap();
        std::fs::create_dir_all(&materials).unwrap();

        save_gray(&maps.join("Wood_metal.png"), 4, 40);
        save_gray(&maps.join("Wood_AO.png"), 4, 120);
        save_gray(&maps.join("Wood_rough.png"), 4, 200);
        write_material(&materials.join("Wood.mat"), &[("_MainTex", "maps/Wood_albedo.png")]);
        write_material(&materials.join("Rock.mat"), &[("_MainTex", "maps/Rock_albedo.png")]);

        let pipeline = Pipeline::new(settings_for(&materials));
        let report = pipeline.process_folders(&[maps.clone()]).unwrap();

        assert_eq!(report.sets.len(), 1);
        let wood = &report.sets[0];
        assert_eq!(wood.name, "Wood");
        assert_eq!(wood.output, Some(maps.join("Wood_packed.png")));
        assert_eq!(wood.materials, vec![materials.join("Wood.mat")]);

        let packed = ImageLoader::load(maps.join("Wood_packed.png")).unwrap();
        assert_eq!((packed.width, packed.height), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(packed.pixel(x, y), Some([40, 120, 200, 255]));
            }
        }

        assert!(!load_import_settings(maps.join("Wood_packed.png")).unwrap().srgb);

        let material = Material::load(materials.join("Wood.mat")).unwrap();
        assert_eq!(material.shader, "Custom/PackedLit");
        let packed_path = maps.join("Wood_packed.png").to_string_lossy().into_owned();
        assert_eq!(
            material.textures["_MetOccRoughMap"].as_deref(),
            Some(packed_path.as_str())
        );
        assert_eq!(Material::load(materials.join("Rock.mat")).unwrap().shader, "Standard");
    }

    #[test]
    fn rerun_ignores_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        save_gray(&tmp.path().join("Wood_metal.png"), 2, 1);

        let pipeline = Pipeline::new(settings_for(&tmp.path().join("materials")));
        pipeline.process_folders(&[tmp.path().to_path_buf()]).unwrap();
        let second = pipeline.process_folders(&[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(second.sets.len(), 1);
        assert_eq!(second.sets[0].channels[0].as_deref(), Some("Wood_metal"));
    }

    #[test]
    fn folders_are_packed_independently() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        save_gray(&a.join("Wood_metal.png"), 2, 10);
        save_gray(&b.join("Rock_rough.png"), 2, 20);

        let pipeline = Pipeline::new(settings_for(&tmp.path().join("materials")));
        let report = pipeline
            .process_folders(&[a.clone(), PathBuf::new(), tmp.path().join("missing"), b.clone()])
            .unwrap();

        let names: Vec<_> = report.sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Wood", "Rock"]);
        assert!(a.join("Wood_packed.png").exists());
        assert!(b.join("Rock_packed.png").exists());
        assert_eq!(report.packed_count(), 2);
    }

    #[test]
    fn empty_inputs_abort() {
        let pipeline = Pipeline::new(Settings::default());
        assert!(matches!(
            pipeline.process_folders(&[]),
            Err(crate::Error::NoInputs(_))
        ));
        assert!(matches!(
            pipeline.process_textures(&[]),
            Err(crate::Error::NoInputs(_))
        ));
    }

    #[test]
    fn explicit_textures_skip_unreadable_entries() {
        let tmp = tempfile::tempdir().unwrap();
        save_gray(&tmp.path().join("Wood_metal.png"), 2, 90);
        save_gray(&tmp.path().join("Wood_albedo.png"), 2, 90);

        let pipeline = Pipeline::new(settings_for(&tmp.path().join("materials")));
        let report = pipeline
            .process_textures(&[
                tmp.path().join("Wood_metal.png"),
                tmp.path().join("missing.png"),
                tmp.path().join("Wood_albedo.png"),
            ])
            .unwrap();

        assert_eq!(report.sets.len(), 1);
        let packed = ImageLoader::load(tmp.path().join("Wood_packed.png")).unwrap();
        assert_eq!(packed.pixel(0, 0), Some([90, 255, 0, 255]));
    }

    #[test]
    fn plan_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        save_gray(&tmp.path().join("Wood_metal.png"), 2, 1);
        save_gray(&tmp.path().join("Wood_rough.png"), 2, 1);

        let pipeline = Pipeline::new(Settings::default());
        let sets = pipeline.plan_folders(&[tmp.path().to_path_buf()]).unwrap();

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].input_count(), 2);
        assert!(!tmp.path().join("Wood_packed.png").exists());
    }
}
