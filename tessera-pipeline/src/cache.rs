use crate::{HashMap, HashSet, PipelineError, PipelineResult};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tessera_codegen::CodegenTarget;

/// Modification time of a file in seconds since the unix epoch
pub fn modified_time(path: &Path) -> PipelineResult<f64> {
    let modified = std::fs::metadata(path)
        .and_then(|x| x.modified())
        .map_err(|e| PipelineError::io(path, e))?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|x| x.as_secs_f64())
        .unwrap_or(0.0))
}

/// Reads the descriptor a generated file was produced from, or None if the file has no marker
fn generated_from(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let mut first_line = String::new();
    std::io::BufReader::new(file)
        .read_line(&mut first_line)
        .ok()?;
    CodegenTarget::parse_marker(&first_line).map(|x| x.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub deleted_files: Vec<PathBuf>,
    pub deleted_dirs: Vec<PathBuf>,
}

/// Tracks descriptor modification times between runs so unchanged descriptors can be skipped, and
/// sweeps generated files that no descriptor of the current run accounts for.
///
/// Keys are project-relative descriptor paths with '/' separators.
pub struct DescriptorCache {
    path: PathBuf,
    entries: BTreeMap<String, f64>,
    marked: HashSet<String>,
    // Outputs (relative to the generated root) written this run, per regenerated descriptor
    outputs: HashMap<String, Vec<PathBuf>>,
}

impl DescriptorCache {
    /// Loads the cache persisted at `path`. A missing or unparsable file is an empty cache.
    #[profiling::function]
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, f64>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Cache {:?} could not be parsed, every descriptor will be regenerated: {}",
                        path,
                        e
                    );
                    BTreeMap::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::default(),
            Err(e) => {
                log::warn!(
                    "Cache {:?} could not be read, every descriptor will be regenerated: {}",
                    path,
                    e
                );
                BTreeMap::default()
            }
        };

        DescriptorCache {
            path: path.to_path_buf(),
            entries,
            marked: Default::default(),
            outputs: Default::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }

    pub fn mark(
        &mut self,
        key: &str,
    ) {
        self.marked.insert(key.to_string());
    }

    pub fn is_marked(
        &self,
        key: &str,
    ) -> bool {
        self.marked.contains(key)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// True when the descriptor has never been seen or was modified since it was last generated
    pub fn is_dirty(
        &self,
        key: &str,
        descriptor_path: &Path,
    ) -> PipelineResult<bool> {
        let modified = modified_time(descriptor_path)?;
        Ok(self.entries.get(key) != Some(&modified))
    }

    /// Records the descriptor's current modification time after it was generated successfully
    pub fn update(
        &mut self,
        key: &str,
        descriptor_path: &Path,
    ) -> PipelineResult<()> {
        let modified = modified_time(descriptor_path)?;
        self.entries.insert(key.to_string(), modified);
        Ok(())
    }

    /// Forgets the descriptor's modification time so the next run tries it again
    pub fn invalidate(
        &mut self,
        key: &str,
    ) {
        self.entries.remove(key);
    }

    pub fn record_outputs(
        &mut self,
        key: &str,
        outputs: Vec<PathBuf>,
    ) {
        self.outputs.insert(key.to_string(), outputs);
    }

    fn is_stale(
        &self,
        generated_root: &Path,
        file: &Path,
    ) -> bool {
        let Some(source) = generated_from(file) else {
            log::info!("Removing {:?}, it was not generated by this pipeline", file);
            return true;
        };

        if !self.marked.contains(&source) {
            log::info!("Removing {:?}, its descriptor {} no longer exists", file, source);
            return true;
        }

        // Outputs the descriptor produced under a previous archetype name
        if let Some(outputs) = self.outputs.get(&source) {
            let relative = file.strip_prefix(generated_root).unwrap_or(file);
            if !outputs.iter().any(|x| x == relative) {
                log::info!("Removing {:?}, {} no longer generates it", file, source);
                return true;
            }
        }

        false
    }

    /// Deletes every generated file whose descriptor was not marked in this run, then removes
    /// directories left empty. The generated root itself is kept.
    #[profiling::function]
    pub fn prune(
        &self,
        generated_root: &Path,
    ) -> PipelineResult<PruneSummary> {
        let mut summary = PruneSummary::default();
        if !generated_root.is_dir() {
            return Ok(summary);
        }

        let generated_root =
            dunce::canonicalize(generated_root).map_err(|e| PipelineError::io(generated_root, e))?;

        let walker = globwalk::GlobWalkerBuilder::from_patterns(&generated_root, &["**"])
            .file_type(globwalk::FileType::FILE)
            .build()?;

        for file in walker {
            let file = file.map_err(|e| format!("Failed to walk {:?}: {}", generated_root, e))?;
            let file = dunce::canonicalize(file.path()).map_err(|e| PipelineError::io(file.path(), e))?;
            if self.is_stale(&generated_root, &file) {
                std::fs::remove_file(&file).map_err(|e| PipelineError::io(&file, e))?;
                summary.deleted_files.push(file);
            }
        }

        let walker = globwalk::GlobWalkerBuilder::from_patterns(&generated_root, &["**"])
            .file_type(globwalk::FileType::DIR)
            .build()?;

        let mut dirs = Vec::default();
        for dir in walker {
            let dir = dir.map_err(|e| format!("Failed to walk {:?}: {}", generated_root, e))?;
            dirs.push(dir.path().to_path_buf());
        }

        // Deepest first so a parent is empty by the time it is visited
        dirs.sort_by_key(|x| std::cmp::Reverse(x.components().count()));
        for dir in dirs {
            if dir == generated_root {
                continue;
            }

            let is_empty = std::fs::read_dir(&dir)
                .map_err(|e| PipelineError::io(&dir, e))?
                .next()
                .is_none();
            if is_empty {
                std::fs::remove_dir(&dir).map_err(|e| PipelineError::io(&dir, e))?;
                log::info!("Removed empty directory {:?}", dir);
                summary.deleted_dirs.push(dir);
            }
        }

        Ok(summary)
    }

    fn write(
        &self,
        entries: &BTreeMap<&String, &f64>,
    ) -> PipelineResult<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        if std::fs::read_to_string(&self.path).ok().as_deref() == Some(contents.as_str()) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        std::fs::write(&self.path, contents).map_err(|e| PipelineError::io(&self.path, e))
    }

    /// Persists only the entries of descriptors marked in this run
    #[profiling::function]
    pub fn persist(&self) -> PipelineResult<()> {
        let retained: BTreeMap<&String, &f64> = self
            .entries
            .iter()
            .filter(|(key, _)| self.marked.contains(*key))
            .collect();
        self.write(&retained)
    }

    /// Persists every entry. Used by runs that only visit some of the project's descriptors.
    pub fn persist_all(&self) -> PipelineResult<()> {
        self.write(&self.entries.iter().collect())
    }
}
