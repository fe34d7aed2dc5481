use crate::{HashMap, PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use tessera_data::descriptor;
use tessera_data::{Document, ImportKind, MetaType};

mod sidecar;
pub use sidecar::{sidecar_path, SideCar};

mod texture_importer;
pub use texture_importer::TextureImporter;

mod font_importer;
pub use font_importer::FontImporter;

/// Modes of an importer run over an asset tree
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ImportFlags {
    /// Descend into subdirectories
    pub recur: bool,
    /// Delete side-cars whose asset file no longer exists
    pub prune: bool,
    /// Replace existing side-car bodies with the layered defaults
    pub default: bool,
    /// Remove side-car bodies instead of creating them
    pub clear: bool,
}

/// Everything an importer needs to know about the asset it is producing a side-car body for
pub struct ImportContext<'a> {
    pub asset_path: &'a Path,
    pub import_kind: ImportKind,
    /// Body of the project's asset_defaults descriptor, empty if the project has none
    pub project_defaults: &'a Document,
}

pub trait Importer {
    fn importer_name(&self) -> &'static str;

    // Used to allow the importer registry to return the importer for a given filename extension
    fn supported_file_extensions(&self) -> &[&'static str];

    fn meta_type(&self) -> MetaType;

    /// Key the importer's body is stored under in a side-car
    fn body_key(&self) -> &'static str;

    /// A fully defaulted body for a new side-car, or when defaults are forced
    fn default_body(
        &self,
        context: &ImportContext,
    ) -> Document;

    /// Fills options missing from an existing body. Values that are present are never changed.
    fn refresh_body(
        &self,
        context: &ImportContext,
        body: &mut Document,
    );

    /// Problems worth warning about in a body. These never prevent the side-car from being written.
    fn check_body(
        &self,
        context: &ImportContext,
        body: &Document,
    ) -> Vec<String>;

    fn supports_file(
        &self,
        path: &Path,
    ) -> bool {
        path.extension()
            .and_then(|x| x.to_str())
            .map(|x| {
                let extension = x.to_ascii_lowercase();
                self.supported_file_extensions().contains(&extension.as_str())
            })
            .unwrap_or(false)
    }
}

#[derive(Default)]
pub struct ImporterRegistry {
    registered_importers: Vec<Box<dyn Importer>>,
    file_extension_associations: HashMap<String, usize>,
}

impl ImporterRegistry {
    pub fn with_builtin_importers() -> Self {
        let mut registry = ImporterRegistry::default();
        registry.register_importer::<TextureImporter>();
        registry.register_importer::<FontImporter>();
        registry
    }

    pub fn register_importer<T: Importer + Default + 'static>(&mut self) {
        let importer = Box::new(T::default());
        let index = self.registered_importers.len();
        for extension in importer.supported_file_extensions() {
            let old = self
                .file_extension_associations
                .insert(extension.to_string(), index);
            if old.is_some() {
                log::warn!(
                    "Importer {} replaces an earlier importer for extension {:?}",
                    importer.importer_name(),
                    extension
                );
            }
        }
        self.registered_importers.push(importer);
    }

    pub fn importer(
        &self,
        name: &str,
    ) -> Option<&dyn Importer> {
        self.registered_importers
            .iter()
            .find(|x| x.importer_name() == name)
            .map(|x| &**x)
    }

    pub fn importer_for_file_extension(
        &self,
        extension: &str,
    ) -> Option<&dyn Importer> {
        self.file_extension_associations
            .get(&extension.to_ascii_lowercase())
            .map(|index| &*self.registered_importers[*index])
    }

    pub fn importer_names(&self) -> Vec<&'static str> {
        self.registered_importers
            .iter()
            .map(|x| x.importer_name())
            .collect()
    }
}

/// Counts of what an importer run did to the side-cars it visited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub pruned: usize,
    pub cleared: usize,
}

impl ImportSummary {
    pub fn add(
        &mut self,
        other: &ImportSummary,
    ) {
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.pruned += other.pruned;
        self.cleared += other.cleared;
    }
}

pub struct ImportOptions<'a> {
    pub sidecar_extension: &'a str,
    pub project_defaults: &'a Document,
    pub flags: ImportFlags,
}

/// Reads the project's asset_defaults descriptor. A missing or malformed file means the project
/// has no defaults of its own.
pub fn load_project_defaults(path: &Path) -> Document {
    match descriptor::load_with_meta(path) {
        Ok((meta, document)) => {
            if !meta.is_empty() && !meta.is_type(MetaType::AssetDefaults) {
                log::warn!(
                    "Asset defaults descriptor {:?} has meta type {:?}, expected {:?}",
                    path,
                    meta.get("type"),
                    MetaType::AssetDefaults.as_str()
                );
            }
            document
        }
        Err(e) if e.is_not_found() => Document::new(),
        Err(e) => {
            log::warn!("Ignoring asset defaults descriptor: {}", e);
            Document::new()
        }
    }
}

fn gather_files(
    root: &Path,
    recur: bool,
) -> PipelineResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    if !root.is_dir() {
        return Err(PipelineError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "asset root does not exist"),
        ));
    }

    let mut builder = globwalk::GlobWalkerBuilder::from_patterns(root, &["**"])
        .file_type(globwalk::FileType::FILE)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));
    if !recur {
        builder = builder.max_depth(1);
    }

    let mut files = Vec::default();
    for file in builder.build()? {
        let file = file.map_err(|e| format!("Failed to walk asset root {:?}: {}", root, e))?;
        files.push(file.path().to_path_buf());
    }

    Ok(files)
}

/// Runs `importer` over an asset root (a directory, or a single asset or side-car file)
#[profiling::function]
pub fn import_path(
    importer: &dyn Importer,
    root: &Path,
    options: &ImportOptions,
) -> PipelineResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    for file in gather_files(root, options.flags.recur)? {
        if let Some(sidecar) = SideCar::for_sidecar_file(importer, &file, options.sidecar_extension) {
            if options.flags.clear {
                sidecar.clear(importer, &mut summary)?;
            } else if options.flags.prune && !sidecar.asset_path.exists() {
                sidecar.prune(&mut summary)?;
            }
        } else if !options.flags.clear && importer.supports_file(&file) {
            let sidecar = SideCar::for_asset_file(&file, options.sidecar_extension);
            sidecar.refresh(importer, options, &mut summary)?;
        }
    }

    log::info!(
        "Importer {} on {:?}: {} created, {} updated, {} unchanged, {} pruned, {} cleared",
        importer.importer_name(),
        root,
        summary.created,
        summary.updated,
        summary.unchanged,
        summary.pruned,
        summary.cleared
    );

    Ok(summary)
}
