pub use tessera_base::{HashMap, HashSet};
pub use tessera_codegen as codegen;
pub use tessera_data as data;

mod pipeline_error;
pub use pipeline_error::{PipelineError, PipelineResult};

mod project;
pub use project::{ImportFlagsJson, TesseraProjectConfiguration, TesseraProjectConfigurationJson, PROJECT_FILE_NAME};

pub mod import;
pub use import::{
    import_path, load_project_defaults, FontImporter, ImportFlags, ImportOptions, ImportSummary, Importer,
    ImporterRegistry, TextureImporter,
};

pub mod cache;
pub use cache::DescriptorCache;

pub mod manifest;

pub mod generate;
pub use generate::{generate_entries, process_descriptor, DescriptorOutcome, GenerateScope};

mod prebuild;
pub use prebuild::{
    generate_manifest, import_manifest, prebuild, PhaseReport, PrebuildOptions, PrebuildReport,
    GENERATE_ARCHETYPES_PHASE, IMPORT_FONTS_PHASE, IMPORT_TEXTURES_PHASE,
};
