use crate::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};

/// Reads a manifest: one asset root per line. Lines are trimmed, blank lines and lines starting
/// with '#' are skipped. A missing manifest lists nothing.
pub fn read_manifest(path: &Path) -> PipelineResult<Vec<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Manifest {:?} does not exist, treating it as empty", path);
            return Ok(Vec::default());
        }
        Err(e) => return Err(PipelineError::io(path, e)),
    };

    Ok(parse_manifest(&contents))
}

pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty() && !x.starts_with('#'))
        .map(|x| x.to_string())
        .collect()
}

/// An asset root from a manifest and the descriptors found under it
pub struct ManifestRoot {
    /// Directory descriptor paths are taken relative to when mirroring them into the generated tree
    pub base_dir: PathBuf,
    pub descriptors: Vec<PathBuf>,
}

/// A file entry is a single descriptor. A directory entry is walked recursively for files with one
/// of `extensions`.
#[profiling::function]
pub fn collect_descriptors(
    root: &Path,
    extensions: &[String],
) -> PipelineResult<ManifestRoot> {
    if root.is_file() {
        let base_dir = root.parent().map(|x| x.to_path_buf()).unwrap_or_default();
        return Ok(ManifestRoot {
            base_dir,
            descriptors: vec![root.to_path_buf()],
        });
    }

    if !root.is_dir() {
        return Err(PipelineError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "manifest entry does not exist"),
        ));
    }

    let patterns: Vec<String> = extensions.iter().map(|x| format!("**/*.{}", x)).collect();
    let walker = globwalk::GlobWalkerBuilder::from_patterns(root, patterns.as_slice())
        .file_type(globwalk::FileType::FILE)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .build()?;

    let mut descriptors = Vec::default();
    for file in walker {
        let file = file.map_err(|e| format!("Failed to walk {:?}: {}", root, e))?;
        descriptors.push(file.path().to_path_buf());
    }

    Ok(ManifestRoot {
        base_dir: root.to_path_buf(),
        descriptors,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let entries = parse_manifest("assets/ui\n\n  # old\n\tassets/hud  \r\n#x\n");
        assert_eq!(entries, vec!["assets/ui".to_string(), "assets/hud".to_string()]);
    }

    #[test]
    fn missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_manifest(&dir.path().join("manifest.txt")).unwrap().is_empty());
    }

    #[test]
    fn directories_are_walked_for_descriptor_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("ui").join("menus");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("ui").join("Button.toml"), "").unwrap();
        std::fs::write(nested.join("Menu.toml"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();

        let root = collect_descriptors(&dir.path().join("ui"), &["toml".to_string()]).unwrap();
        assert_eq!(root.base_dir, dir.path().join("ui"));
        let mut names: Vec<_> = root
            .descriptors
            .iter()
            .map(|x| x.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Button.toml".to_string(), "Menu.toml".to_string()]);

        let single = collect_descriptors(&nested.join("Menu.toml"), &[]).unwrap();
        assert_eq!(single.base_dir, nested);
        assert_eq!(single.descriptors.len(), 1);
    }
}
