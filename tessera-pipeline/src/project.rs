use crate::import::ImportFlags;
use crate::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tessera_codegen::CodegenTarget;

pub const PROJECT_FILE_NAME: &str = "tessera_project.json";

fn default_texture_manifest() -> String {
    ".gen/textures.txt".to_string()
}

fn default_font_manifest() -> String {
    ".gen/fonts.txt".to_string()
}

fn default_archetype_manifest() -> String {
    ".gen/manifest.txt".to_string()
}

fn default_cache_file() -> String {
    ".gen/cache.json".to_string()
}

fn default_generated_code_path() -> String {
    ".gen/code".to_string()
}

fn default_asset_defaults_path() -> String {
    "asset_defaults.toml".to_string()
}

fn default_sidecar_extension() -> String {
    "toml".to_string()
}

fn default_descriptor_extensions() -> Vec<String> {
    vec!["toml".to_string()]
}

fn default_header_extension() -> String {
    "h".to_string()
}

fn default_body_extension() -> String {
    "cpp".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportFlagsJson {
    #[serde(default = "default_true")]
    pub recur: bool,
    #[serde(default = "default_true")]
    pub prune: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub clear: bool,
}

impl Default for ImportFlagsJson {
    fn default() -> Self {
        ImportFlagsJson {
            recur: true,
            prune: true,
            default: false,
            clear: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TesseraProjectConfigurationJson {
    #[serde(default = "default_texture_manifest")]
    pub texture_manifest: String,
    #[serde(default = "default_font_manifest")]
    pub font_manifest: String,
    #[serde(default = "default_archetype_manifest")]
    pub archetype_manifest: String,
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    #[serde(default = "default_generated_code_path")]
    pub generated_code_path: String,
    #[serde(default = "default_asset_defaults_path")]
    pub asset_defaults_path: String,
    #[serde(default = "default_sidecar_extension")]
    pub sidecar_extension: String,
    #[serde(default = "default_descriptor_extensions")]
    pub descriptor_extensions: Vec<String>,
    #[serde(default = "default_header_extension")]
    pub header_extension: String,
    #[serde(default = "default_body_extension")]
    pub body_extension: String,
    #[serde(default)]
    pub import: ImportFlagsJson,
}

impl Default for TesseraProjectConfigurationJson {
    fn default() -> Self {
        TesseraProjectConfigurationJson {
            texture_manifest: default_texture_manifest(),
            font_manifest: default_font_manifest(),
            archetype_manifest: default_archetype_manifest(),
            cache_file: default_cache_file(),
            generated_code_path: default_generated_code_path(),
            asset_defaults_path: default_asset_defaults_path(),
            sidecar_extension: default_sidecar_extension(),
            descriptor_extensions: default_descriptor_extensions(),
            header_extension: default_header_extension(),
            body_extension: default_body_extension(),
            import: ImportFlagsJson::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TesseraProjectConfiguration {
    // Directory containing the project file. Manifest entries and cache keys are relative to it.
    pub root_path: PathBuf,

    // Manifests listing asset roots, one path per line
    pub texture_manifest: PathBuf,
    pub font_manifest: PathBuf,
    pub archetype_manifest: PathBuf,

    // Path to the json file holding descriptor modification times from the last run
    pub cache_file: PathBuf,

    // Root of the generated source tree. Everything under it is owned by the pipeline.
    pub generated_code_path: PathBuf,

    // Project-wide defaults descriptor (meta type asset_defaults). Optional on disk.
    pub asset_defaults_path: PathBuf,

    pub sidecar_extension: String,
    pub descriptor_extensions: Vec<String>,
    pub target: CodegenTarget,
    pub import_flags: ImportFlags,
}

impl TesseraProjectConfiguration {
    pub fn unverified_absolute_path(
        root_path: &Path,
        json_path: &str,
    ) -> PathBuf {
        if Path::new(json_path).is_absolute() {
            PathBuf::from(json_path)
        } else {
            root_path.join(json_path)
        }
    }

    // root_path is the directory the project lives in, json is the (possibly defaulted) content of
    // the project file
    pub fn from_json(
        root_path: &Path,
        json: TesseraProjectConfigurationJson,
    ) -> Self {
        TesseraProjectConfiguration {
            root_path: root_path.to_path_buf(),
            texture_manifest: Self::unverified_absolute_path(root_path, &json.texture_manifest),
            font_manifest: Self::unverified_absolute_path(root_path, &json.font_manifest),
            archetype_manifest: Self::unverified_absolute_path(root_path, &json.archetype_manifest),
            cache_file: Self::unverified_absolute_path(root_path, &json.cache_file),
            generated_code_path: Self::unverified_absolute_path(root_path, &json.generated_code_path),
            asset_defaults_path: Self::unverified_absolute_path(root_path, &json.asset_defaults_path),
            sidecar_extension: json.sidecar_extension,
            descriptor_extensions: json.descriptor_extensions,
            target: CodegenTarget {
                header_extension: json.header_extension,
                body_extension: json.body_extension,
            },
            import_flags: ImportFlags {
                recur: json.import.recur,
                prune: json.import.prune,
                default: json.import.default,
                clear: json.import.clear,
            },
        }
    }

    /// Project rooted at `root_path` with every setting defaulted
    pub fn with_defaults(root_path: &Path) -> Self {
        Self::from_json(root_path, TesseraProjectConfigurationJson::default())
    }

    pub fn read_from_path(path: &Path) -> PipelineResult<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| format!("Parent of project file path {:?} could not be found", path))?;
        let root_path = dunce::canonicalize(parent).map_err(|e| PipelineError::io(parent, e))?;
        let file_contents = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let project_file: TesseraProjectConfigurationJson = serde_json::from_str(&file_contents)?;
        Ok(Self::from_json(&root_path, project_file))
    }

    /// Walks up from `search_location` looking for the project file
    pub fn locate_project_file(search_location: &Path) -> PipelineResult<Self> {
        let mut path = Some(search_location.to_path_buf());
        while let Some(p) = path {
            let joined_path = p.join(PROJECT_FILE_NAME);
            if joined_path.exists() {
                log::info!("Using project configuration at {:?}", joined_path);
                return Self::read_from_path(&joined_path);
            }

            path = p.parent().map(|x| x.to_path_buf());
        }

        Err(format!(
            "{} could not be located at {:?} or in any of its parent directories",
            PROJECT_FILE_NAME, search_location
        ))?
    }

    /// Like `locate_project_file`, but falls back to a defaulted project rooted at
    /// `search_location` when no project file exists
    pub fn locate_or_default(search_location: &Path) -> PipelineResult<Self> {
        let mut path = Some(search_location.to_path_buf());
        while let Some(p) = path {
            if p.join(PROJECT_FILE_NAME).exists() {
                return Self::locate_project_file(&p);
            }
            path = p.parent().map(|x| x.to_path_buf());
        }

        let root_path =
            dunce::canonicalize(search_location).map_err(|e| PipelineError::io(search_location, e))?;
        log::info!(
            "No {} found, using default project settings rooted at {:?}",
            PROJECT_FILE_NAME,
            root_path
        );
        Ok(Self::with_defaults(&root_path))
    }

    /// Key used for `path` in the cache and in generated-file markers: relative to the project root
    /// with '/' separators. Paths outside the project are used as-is.
    pub fn project_relative(
        &self,
        path: &Path,
    ) -> String {
        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);
        relative
            .components()
            .map(|x| x.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Resolves a manifest entry against the project root
    pub fn resolve(
        &self,
        entry: &str,
    ) -> PathBuf {
        Self::unverified_absolute_path(&self.root_path, entry)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let json: TesseraProjectConfigurationJson =
            serde_json::from_str(r#"{ "generated_code_path": "out/code", "import": { "prune": false } }"#)
                .unwrap();
        let project = TesseraProjectConfiguration::from_json(Path::new("/project"), json);

        assert_eq!(project.generated_code_path, Path::new("/project/out/code"));
        assert_eq!(project.archetype_manifest, Path::new("/project/.gen/manifest.txt"));
        assert_eq!(project.cache_file, Path::new("/project/.gen/cache.json"));
        assert_eq!(project.target, CodegenTarget::default());
        assert_eq!(project.descriptor_extensions, vec!["toml".to_string()]);
        assert!(project.import_flags.recur);
        assert!(!project.import_flags.prune);
        assert!(!project.import_flags.default);
    }

    #[test]
    fn project_relative_keys_use_forward_slashes() {
        let project = TesseraProjectConfiguration::with_defaults(Path::new("/project"));
        assert_eq!(
            project.project_relative(&Path::new("/project").join("assets").join("HelloBox.toml")),
            "assets/HelloBox.toml"
        );
    }

    #[test]
    fn locate_walks_up_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_FILE_NAME),
            r#"{ "sidecar_extension": "meta" }"#,
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let project = TesseraProjectConfiguration::locate_project_file(&nested).unwrap();
        assert_eq!(project.sidecar_extension, "meta");
        assert_eq!(project.root_path, dunce::canonicalize(dir.path()).unwrap());
    }
}
