//! Archetypes aggregate renderables under one local transformer. A descriptor is read into an
//! [`ArchetypeDescriptor`], validated, and turned into a header/body pair.

use crate::codegen_error::{ArchetypeErrorKind, CodegenError, CodegenResult};
use crate::renderable::RenderableKind;
use crate::target::CodegenTarget;
use crate::Document;
use std::path::Path;
use toml::Value;

mod body;
mod header;
mod validate;

pub use validate::{is_valid_archetype_name, is_valid_renderable_name, validate, RESERVED_NAMES};

pub const ARCHETYPE_KEY: &str = "archetype";
pub const DRAW_KEY: &str = "draw";

#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub kind: RenderableKind,
    pub name: String,
    pub fragment: Document,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeDescriptor {
    pub name: String,
    pub transformer: Option<Document>,
    /// Grouped by kind in header order, declaration order within a kind
    pub renderables: Vec<Renderable>,
    pub draw: Vec<String>,
}

impl ArchetypeDescriptor {
    pub fn from_document(document: &Document) -> Result<Self, ArchetypeErrorKind> {
        let archetype = document
            .get(ARCHETYPE_KEY)
            .and_then(|x| x.as_table())
            .ok_or(ArchetypeErrorKind::MissingArchetype)?;

        let name = archetype
            .get("name")
            .and_then(|x| x.as_str())
            .ok_or(ArchetypeErrorKind::MissingArchetype)?
            .to_string();

        let transformer = match archetype.get(crate::emitter::TRANSFORMER_KEY) {
            None => None,
            Some(Value::Table(table)) => Some(table.clone()),
            Some(other) => {
                return Err(ArchetypeErrorKind::InvalidAttribute {
                    renderable: name,
                    attribute: crate::emitter::TRANSFORMER_KEY.to_string(),
                    message: format!("expected a table, found {}", other.type_str()),
                })
            }
        };

        let mut renderables = Vec::default();
        for kind in RenderableKind::ALL {
            let Some(value) = archetype.get(kind.key()) else {
                continue;
            };

            let malformed = |index: usize, message: String| ArchetypeErrorKind::MalformedRenderable {
                kind: kind.key().to_string(),
                index,
                message,
            };

            let entries = value
                .as_array()
                .ok_or_else(|| malformed(0, format!("expected an array of tables, found {}", value.type_str())))?;

            for (index, entry) in entries.iter().enumerate() {
                let fragment = entry
                    .as_table()
                    .ok_or_else(|| malformed(index, format!("expected a table, found {}", entry.type_str())))?;

                let renderable_name = fragment
                    .get("name")
                    .and_then(|x| x.as_str())
                    .ok_or_else(|| malformed(index, "missing string \"name\"".to_string()))?;

                renderables.push(Renderable {
                    kind,
                    name: renderable_name.to_string(),
                    fragment: fragment.clone(),
                });
            }
        }

        let mut draw = Vec::default();
        if let Some(value) = archetype.get(DRAW_KEY) {
            let entries = value.as_array().ok_or_else(|| ArchetypeErrorKind::InvalidAttribute {
                renderable: name.clone(),
                attribute: DRAW_KEY.to_string(),
                message: format!("expected an array of names, found {}", value.type_str()),
            })?;

            for entry in entries {
                let entry = entry.as_str().ok_or_else(|| ArchetypeErrorKind::InvalidAttribute {
                    renderable: name.clone(),
                    attribute: DRAW_KEY.to_string(),
                    message: format!("expected a name, found {}", entry.type_str()),
                })?;
                draw.push(entry.to_string());
            }
        }

        for key in archetype.keys() {
            let known = key == "name"
                || key == DRAW_KEY
                || key == crate::emitter::TRANSFORMER_KEY
                || RenderableKind::from_key(key).is_some();
            if !known {
                log::debug!("Archetype {} ignores unrecognized key {:?}", name, key);
            }
        }

        Ok(ArchetypeDescriptor {
            name,
            transformer,
            renderables,
            draw,
        })
    }

    pub fn renderable(
        &self,
        name: &str,
    ) -> Option<&Renderable> {
        self.renderables.iter().find(|x| x.name == name)
    }

    pub fn ticking_renderables(&self) -> impl Iterator<Item = &Renderable> {
        self.renderables.iter().filter(|x| x.kind.ticks())
    }
}

/// Source text for one archetype
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArchetype {
    pub name: String,
    pub header_file_name: String,
    pub body_file_name: String,
    pub header: String,
    pub body: String,
}

/// Validates an archetype descriptor and generates its header and body.
///
/// `path` is used for error reporting and `source` is the descriptor path recorded in each
/// generated file's marker line.
#[profiling::function]
pub fn generate(
    path: &Path,
    document: &Document,
    source: &str,
    target: &CodegenTarget,
) -> CodegenResult<GeneratedArchetype> {
    let error = |kind| CodegenError::new(path, kind);

    let descriptor = ArchetypeDescriptor::from_document(document).map_err(error)?;
    validate(&descriptor).map_err(error)?;

    let header_file_name = target.header_file_name(&descriptor.name);
    let body_file_name = target.body_file_name(&descriptor.name);
    let header = header::generate_header(&descriptor, source);
    let body = body::generate_body(&descriptor, source, &header_file_name).map_err(error)?;

    Ok(GeneratedArchetype {
        name: descriptor.name,
        header_file_name,
        body_file_name,
        header,
        body,
    })
}
