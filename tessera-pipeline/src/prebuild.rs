use crate::generate::{generate_entries, GenerateScope};
use crate::import::{import_path, load_project_defaults, ImportOptions, ImportSummary, Importer, ImporterRegistry};
use crate::manifest::read_manifest;
use crate::project::TesseraProjectConfiguration;
use crate::{PipelineError, PipelineResult};
use std::path::Path;
use std::time::Instant;

pub const IMPORT_TEXTURES_PHASE: &str = "import textures";
pub const IMPORT_FONTS_PHASE: &str = "import fonts";
pub const GENERATE_ARCHETYPES_PHASE: &str = "generate archetypes";

#[derive(Debug, Copy, Clone, Default)]
pub struct PrebuildOptions {
    /// Regenerate every archetype regardless of the cache
    pub force: bool,
}

#[derive(Debug)]
pub struct PhaseReport {
    pub name: &'static str,
    pub seconds: f64,
    pub errors: Vec<PipelineError>,
}

/// Outcome of a prebuild. A failing phase does not stop the phases after it.
#[derive(Debug, Default)]
pub struct PrebuildReport {
    pub phases: Vec<PhaseReport>,
}

impl PrebuildReport {
    pub fn has_errors(&self) -> bool {
        self.phases.iter().any(|x| !x.errors.is_empty())
    }

    pub fn error_count(&self) -> usize {
        self.phases.iter().map(|x| x.errors.len()).sum()
    }

    pub fn errors(&self) -> impl Iterator<Item = &PipelineError> {
        self.phases.iter().flat_map(|x| x.errors.iter())
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }
}

/// Runs an importer over every root listed in a manifest
pub fn import_manifest(
    project: &TesseraProjectConfiguration,
    importer: &dyn Importer,
    manifest: &Path,
) -> PipelineResult<ImportSummary> {
    let project_defaults = load_project_defaults(&project.asset_defaults_path);
    let options = ImportOptions {
        sidecar_extension: &project.sidecar_extension,
        project_defaults: &project_defaults,
        flags: project.import_flags,
    };

    let mut summary = ImportSummary::default();
    for entry in read_manifest(manifest)? {
        let root = project.resolve(&entry);
        summary.add(&import_path(importer, &root, &options)?);
    }

    Ok(summary)
}

/// Generates every archetype listed in the project's archetype manifest, prunes stale outputs and
/// persists the cache. Returns the per-descriptor failures.
pub fn generate_manifest(
    project: &TesseraProjectConfiguration,
    force: bool,
) -> PipelineResult<Vec<PipelineError>> {
    let entries = read_manifest(&project.archetype_manifest)?;
    let summary = generate_entries(project, &entries, GenerateScope::Project, force)?;
    log::info!(
        "{} archetypes generated, {} unchanged, {} other descriptors skipped, {} failed",
        summary.generated,
        summary.clean,
        summary.skipped,
        summary.failures.len()
    );
    Ok(summary.failures)
}

fn run_phase<F: FnOnce() -> PipelineResult<Vec<PipelineError>>>(
    name: &'static str,
    f: F,
) -> PhaseReport {
    log::info!("Starting {}", name);
    let start = Instant::now();
    let errors = match f() {
        Ok(errors) => errors,
        Err(e) => {
            log::error!("{} failed: {}", name, e);
            vec![e]
        }
    };
    let seconds = start.elapsed().as_secs_f64();
    println!("-- <PreBuild>: {} ({:.3}s)", name, seconds);

    PhaseReport {
        name,
        seconds,
        errors,
    }
}

fn import_phase(
    project: &TesseraProjectConfiguration,
    registry: &ImporterRegistry,
    importer_name: &str,
    manifest: &Path,
) -> PipelineResult<Vec<PipelineError>> {
    let importer = registry
        .importer(importer_name)
        .ok_or_else(|| format!("No importer named {:?} is registered", importer_name))?;
    import_manifest(project, importer, manifest)?;
    Ok(Vec::default())
}

/// The single entry point run by the build: import textures, import fonts, then generate
/// archetypes. Each phase prints a timing line to stdout.
#[profiling::function]
pub fn prebuild(
    project: &TesseraProjectConfiguration,
    options: PrebuildOptions,
) -> PrebuildReport {
    let registry = ImporterRegistry::with_builtin_importers();
    let mut report = PrebuildReport::default();

    report.phases.push(run_phase(IMPORT_TEXTURES_PHASE, || {
        import_phase(project, &registry, "textures", &project.texture_manifest)
    }));
    report.phases.push(run_phase(IMPORT_FONTS_PHASE, || {
        import_phase(project, &registry, "fonts", &project.font_manifest)
    }));
    report.phases.push(run_phase(GENERATE_ARCHETYPES_PHASE, || {
        generate_manifest(project, options.force)
    }));

    report
}
