//! Texture discovery in folders.

use crate::image_loading::{ImageLoader, TextureRef};
use crate::persist::PACKED_SUFFIX;
use crate::Result;
use std::path::{Path, PathBuf};

/// Recursively collect image files under `folder`, sorted by path.
fn collect_image_paths(folder: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_image_paths(&path, out)?;
        } else if path.is_file() && ImageLoader::has_image_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Outputs of an earlier run are not sources.
fn is_packed_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(PACKED_SUFFIX))
        .unwrap_or(false)
}

/// Find all source textures under `folder`.
///
/// Files are visited in path order so textures of one set are adjacent.
/// Files whose header cannot be read are skipped with a warning.
pub fn discover_textures<P: AsRef<Path>>(folder: P) -> Result<Vec<TextureRef>> {
    let folder = folder.as_ref();
    let mut paths = Vec::new();
    collect_image_paths(folder, &mut paths)?;
    paths.sort();

    let mut textures = Vec::with_capacity(paths.len());
    for path in paths {
        if is_packed_output(&path) {
            log::debug!("Skipping packed output {}", path.display());
            continue;
        }
        match TextureRef::open(&path) {
            Ok(texture) => textures.push(texture),
            Err(e) => log::warn!("Skipping unreadable texture {}: {}", path.display(), e),
        }
    }
    Ok(textures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_gray(path: &Path, size: u32) {
        image::GrayImage::from_pixel(size, size, image::Luma([10])).save(path).unwrap();
    }

    #[test]
    fn finds_images_recursively_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("rock");
        std::fs::create_dir_all(&nested).unwrap();

        save_gray(&tmp.path().join("Wood_rough.png"), 4);
        save_gray(&tmp.path().join("Wood_metal.png"), 4);
        save_gray(&nested.join("Rock_AO.png"), 2);
        std::fs::write(tmp.path().join("notes.txt"), "hello").unwrap();

        let textures = discover_textures(tmp.path()).unwrap();
        let names: Vec<_> = textures.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Wood_metal", "Wood_rough", "Rock_AO"]);
        assert_eq!((textures[2].width, textures[2].height), (2, 2));
    }

    #[test]
    fn skips_packed_outputs_and_broken_files() {
        let tmp = tempfile::tempdir().unwrap();
        save_gray(&tmp.path().join("Wood_metal.png"), 4);
        save_gray(&tmp.path().join("Wood_packed.png"), 4);
        std::fs::write(tmp.path().join("Wood_AO.png"), b"broken").unwrap();

        let textures = discover_textures(tmp.path()).unwrap();
        assert_eq!(textures.len(), 1);
        assert_eq!(textures[0].name, "Wood_metal");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_folders_are_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        save_gray(&tmp.path().join("Wood_metal.png"), 2);
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop")).unwrap();

        let textures = discover_textures(tmp.path()).unwrap();
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_textures(tmp.path().join("nope")).is_err());
    }
}
