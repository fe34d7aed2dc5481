pub use tessera_base::{HashMap, HashSet};
pub use tessera_data::Document;

mod codegen_error;
pub use codegen_error::{ArchetypeErrorKind, CodegenError, CodegenResult};

pub mod literals;
pub use literals::Indent;

pub mod emitter;
pub use emitter::{EmitError, EmitResult};

mod renderable;
pub use renderable::RenderableKind;

mod target;
pub use target::{CodegenTarget, GENERATED_MARKER};

pub mod archetype;
pub use archetype::{generate, ArchetypeDescriptor, GeneratedArchetype};

#[cfg(test)]
mod tests;
