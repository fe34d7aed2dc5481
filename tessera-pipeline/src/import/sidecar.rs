use super::{ImportContext, ImportOptions, ImportSummary, Importer};
use crate::{PipelineError, PipelineResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tessera_data::descriptor::{self, parse_descriptor, to_descriptor_string};
use tessera_data::{DataError, Document, ImportKind, MetaRecord};
use toml::Value;

/// `<asset>.<sidecar_extension>`
pub fn sidecar_path(
    asset_path: &Path,
    sidecar_extension: &str,
) -> PathBuf {
    let mut name = OsString::from(asset_path.as_os_str());
    name.push(".");
    name.push(sidecar_extension);
    PathBuf::from(name)
}

/// The import descriptor that sits next to an asset file
pub struct SideCar {
    pub path: PathBuf,
    pub asset_path: PathBuf,
}

impl SideCar {
    pub fn for_asset_file(
        asset_path: &Path,
        sidecar_extension: &str,
    ) -> Self {
        SideCar {
            path: sidecar_path(asset_path, sidecar_extension),
            asset_path: asset_path.to_path_buf(),
        }
    }

    /// Recognizes `path` as a side-car of an asset kind the importer handles, i.e. its name is
    /// `<stem>.<asset extension>.<sidecar_extension>`
    pub fn for_sidecar_file(
        importer: &dyn Importer,
        path: &Path,
        sidecar_extension: &str,
    ) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let asset_name = file_name.strip_suffix(sidecar_extension)?.strip_suffix('.')?;
        let asset_path = path.with_file_name(asset_name);
        if asset_name.is_empty() || !importer.supports_file(&asset_path) {
            return None;
        }

        Some(SideCar {
            path: path.to_path_buf(),
            asset_path,
        })
    }

    fn read_contents(&self) -> PipelineResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PipelineError::io(&self.path, e)),
        }
    }

    // Malformed side-cars are recovered as empty documents. The meta line is kept if it parses.
    fn parse(
        &self,
        contents: &str,
    ) -> (MetaRecord, Document) {
        match parse_descriptor(contents) {
            Ok(parsed) => parsed,
            Err(message) => {
                log::warn!(
                    "Side-car {:?} is malformed and will be treated as empty: {}",
                    self.path,
                    message
                );
                let first_line = contents.lines().next().unwrap_or_default();
                (
                    MetaRecord::parse_line(first_line).unwrap_or_default(),
                    Document::new(),
                )
            }
        }
    }

    fn write(
        &self,
        meta: &MetaRecord,
        document: &Document,
        previous_contents: Option<&str>,
    ) -> PipelineResult<bool> {
        let contents = to_descriptor_string(meta, document).map_err(|message| DataError::Serialize {
            path: self.path.clone(),
            message,
        })?;

        if previous_contents == Some(contents.as_str()) {
            return Ok(false);
        }

        descriptor::write_replacing(&self.path, contents.as_bytes())?;
        Ok(true)
    }

    /// Creates the side-car, or brings its body for the importer's kind up to date
    pub fn refresh(
        &self,
        importer: &dyn Importer,
        options: &ImportOptions,
        summary: &mut ImportSummary,
    ) -> PipelineResult<()> {
        let extension = self
            .asset_path
            .extension()
            .and_then(|x| x.to_str())
            .unwrap_or_default();
        let import_kind = ImportKind::from_extension(extension)
            .ok_or_else(|| format!("No import kind is known for asset {:?}", self.asset_path))?;

        let context = ImportContext {
            asset_path: &self.asset_path,
            import_kind,
            project_defaults: options.project_defaults,
        };

        let previous_contents = self.read_contents()?;
        let (meta, mut document) = match &previous_contents {
            Some(contents) => self.parse(contents),
            None => (MetaRecord::default(), Document::new()),
        };

        let existing_body = document
            .get(importer.body_key())
            .and_then(|x| x.as_table())
            .cloned();

        let body = match existing_body {
            Some(mut body) if !options.flags.default => {
                importer.refresh_body(&context, &mut body);
                body
            }
            _ => importer.default_body(&context),
        };

        for problem in importer.check_body(&context, &body) {
            log::warn!("{:?}: {}", self.path, problem);
        }

        document.insert(importer.body_key().to_string(), Value::Table(body));
        let meta = meta.merged_with(&MetaRecord::with_type(importer.meta_type()));

        let written = self.write(&meta, &document, previous_contents.as_deref())?;
        if !written {
            log::debug!("Side-car {:?} is up to date", self.path);
            summary.unchanged += 1;
        } else if previous_contents.is_some() {
            log::info!("Updated side-car {:?}", self.path);
            summary.updated += 1;
        } else {
            log::info!("Created side-car {:?}", self.path);
            summary.created += 1;
        }

        Ok(())
    }

    /// Removes the importer's body, deleting the side-car if nothing else is left in it
    pub fn clear(
        &self,
        importer: &dyn Importer,
        summary: &mut ImportSummary,
    ) -> PipelineResult<()> {
        let Some(contents) = self.read_contents()? else {
            return Ok(());
        };

        let (meta, mut document) = self.parse(&contents);
        let removed = document.remove(importer.body_key()).is_some();

        if document.is_empty() {
            std::fs::remove_file(&self.path).map_err(|e| PipelineError::io(&self.path, e))?;
            log::info!("Removed side-car {:?}", self.path);
        } else if removed {
            self.write(&meta, &document, Some(&contents))?;
            log::info!("Cleared {} from side-car {:?}", importer.body_key(), self.path);
        } else {
            return Ok(());
        }

        summary.cleared += 1;
        Ok(())
    }

    /// Deletes a side-car whose asset file is gone
    pub fn prune(
        &self,
        summary: &mut ImportSummary,
    ) -> PipelineResult<()> {
        std::fs::remove_file(&self.path).map_err(|e| PipelineError::io(&self.path, e))?;
        log::info!(
            "Pruned side-car {:?}, asset {:?} no longer exists",
            self.path,
            self.asset_path
        );
        summary.pruned += 1;
        Ok(())
    }
}
