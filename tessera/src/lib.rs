#[cfg(feature = "tessera-base")]
pub use tessera_base as base;

#[cfg(feature = "tessera-data")]
pub use tessera_data as data;

#[cfg(feature = "tessera-codegen")]
pub use tessera_codegen as codegen;

#[cfg(feature = "tessera-pipeline")]
pub use tessera_pipeline as pipeline;
