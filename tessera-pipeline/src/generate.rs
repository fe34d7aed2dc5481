use crate::cache::DescriptorCache;
use crate::manifest::{collect_descriptors, read_manifest, ManifestRoot};
use crate::project::TesseraProjectConfiguration;
use crate::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use tessera_codegen::{ArchetypeErrorKind, CodegenError};
use tessera_data::{descriptor, MetaType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorOutcome {
    /// Header and body paths, relative to the generated root
    Generated(Vec<PathBuf>),
    /// Unchanged since the last successful generation
    Clean,
    /// Not an archetype descriptor
    Skipped,
}

/// Writes `contents` unless the file already holds exactly that. Returns whether it wrote.
pub fn write_if_changed(
    path: &Path,
    contents: &str,
) -> PipelineResult<bool> {
    if std::fs::read_to_string(path).ok().as_deref() == Some(contents) {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    descriptor::write_replacing(path, contents.as_bytes())?;
    Ok(true)
}

/// Mirrors the descriptor's directory under its manifest root into the generated tree
fn output_dir(
    descriptor_path: &Path,
    base_dir: &Path,
) -> PathBuf {
    descriptor_path
        .parent()
        .and_then(|x| x.strip_prefix(base_dir).ok())
        .map(|x| x.to_path_buf())
        .unwrap_or_default()
}

/// Generates one archetype descriptor if it is dirty. Descriptors of other types are skipped.
///
/// A descriptor that fails to load or validate stays marked, so its previous outputs survive the
/// prune, but its cache entry is dropped so the next run retries it.
#[profiling::function]
pub fn process_descriptor(
    project: &TesseraProjectConfiguration,
    cache: &mut DescriptorCache,
    descriptor_path: &Path,
    base_dir: &Path,
    force: bool,
) -> PipelineResult<DescriptorOutcome> {
    let meta = match descriptor::meta(descriptor_path) {
        Ok(meta) => meta,
        Err(e) if e.is_malformed() => {
            // Type unknown, keep whatever it generated before
            let key = project.project_relative(descriptor_path);
            cache.mark(&key);
            cache.invalidate(&key);
            return Err(CodegenError::new(
                descriptor_path,
                ArchetypeErrorKind::MalformedDescriptor(e.to_string()),
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    if !meta.is_type(MetaType::Archetype) {
        log::debug!("Skipping {:?}, it is not an archetype descriptor", descriptor_path);
        return Ok(DescriptorOutcome::Skipped);
    }

    let key = project.project_relative(descriptor_path);
    cache.mark(&key);

    if !force && !cache.is_dirty(&key, descriptor_path)? {
        log::debug!("Archetype {} is unchanged", key);
        return Ok(DescriptorOutcome::Clean);
    }

    let document = match descriptor::load(descriptor_path) {
        Ok(document) => document,
        Err(e) if e.is_malformed() => {
            cache.invalidate(&key);
            return Err(CodegenError::new(
                descriptor_path,
                ArchetypeErrorKind::MalformedDescriptor(e.to_string()),
            )
            .into());
        }
        Err(e) => {
            cache.invalidate(&key);
            return Err(e.into());
        }
    };

    let generated = match tessera_codegen::generate(descriptor_path, &document, &key, &project.target) {
        Ok(generated) => generated,
        Err(e) => {
            cache.invalidate(&key);
            return Err(e.into());
        }
    };

    let relative_dir = output_dir(descriptor_path, base_dir);
    let header = relative_dir.join(&generated.header_file_name);
    let body = relative_dir.join(&generated.body_file_name);

    let mut written = 0;
    for (relative, contents) in [(&header, &generated.header), (&body, &generated.body)] {
        if write_if_changed(&project.generated_code_path.join(relative), contents)? {
            written += 1;
        }
    }

    log::info!(
        "Generated archetype {} from {} ({} of 2 files written)",
        generated.name,
        key,
        written
    );

    let outputs = vec![header, body];
    cache.record_outputs(&key, outputs.clone());
    cache.update(&key, descriptor_path)?;
    Ok(DescriptorOutcome::Generated(outputs))
}

/// Result of generating every descriptor under a set of manifest entries
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub generated: usize,
    pub clean: usize,
    pub skipped: usize,
    /// Descriptors that could not be generated. They don't stop the others.
    pub failures: Vec<PipelineError>,
}

/// Whether the run covers the whole project (pruning stale outputs and cache entries) or only
/// some descriptors of it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GenerateScope {
    Project,
    Partial,
}

// Directories of the archetype manifest that enclose `path`, so a partial run mirrors descriptors
// to the same place a project run would
fn enclosing_manifest_root(
    project: &TesseraProjectConfiguration,
    path: &Path,
) -> PipelineResult<Option<PathBuf>> {
    Ok(read_manifest(&project.archetype_manifest)?
        .iter()
        .map(|x| project.resolve(x))
        .filter(|x| x.is_dir() && path.starts_with(x))
        .max_by_key(|x| x.components().count()))
}

/// Generates the descriptors under each entry, in order. Per-descriptor failures are collected,
/// any other error stops the run before anything is pruned.
#[profiling::function]
pub fn generate_entries(
    project: &TesseraProjectConfiguration,
    entries: &[String],
    scope: GenerateScope,
    force: bool,
) -> PipelineResult<GenerateSummary> {
    let mut cache = DescriptorCache::load(&project.cache_file);
    let mut summary = GenerateSummary::default();

    for entry in entries {
        let root = project.resolve(entry);
        let ManifestRoot {
            mut base_dir,
            descriptors,
        } = collect_descriptors(&root, &project.descriptor_extensions)?;

        if scope == GenerateScope::Partial {
            if let Some(manifest_root) = enclosing_manifest_root(project, &root)? {
                base_dir = manifest_root;
            }
        }

        for descriptor_path in descriptors {
            match process_descriptor(project, &mut cache, &descriptor_path, &base_dir, force) {
                Ok(DescriptorOutcome::Generated(_)) => summary.generated += 1,
                Ok(DescriptorOutcome::Clean) => summary.clean += 1,
                Ok(DescriptorOutcome::Skipped) => summary.skipped += 1,
                Err(e @ PipelineError::CodegenError(_)) => {
                    log::error!("{}", e);
                    summary.failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    match scope {
        GenerateScope::Project => {
            let pruned = cache.prune(&project.generated_code_path)?;
            if !pruned.deleted_files.is_empty() {
                log::info!("Pruned {} stale generated files", pruned.deleted_files.len());
            }
            cache.persist()?;
        }
        GenerateScope::Partial => cache.persist_all()?,
    }

    Ok(summary)
}
