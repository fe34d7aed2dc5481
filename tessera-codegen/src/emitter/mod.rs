//! Pure converters from descriptor fragments to C++ statements.
//!
//! Every emitter takes `(fragment, output_variable_name, indent)` and returns text. Statements are
//! emitted in a fixed order: the transformer, then the variant tag, then primary attributes in
//! the order the descriptor declares them, then nested sub-fragments. Attributes the descriptor
//! leaves out produce nothing so the engine's own defaults apply.

use crate::literals::{self, EnumTable, Indent};
use crate::renderable::RenderableKind;
use crate::Document;
use std::fmt::Write;
use toml::Value;

mod tables;
pub use tables::{
    NGON_SCHEMA, PARAGRAPH_SCHEMA, SPRITE_ATLAS_SCHEMA, SPRITE_NONANT_SCHEMA, SPRITE_SCHEMA,
    TILEMAP_SCHEMA, TRANSFORMER_SCHEMA,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EmitError {
    /// Dotted path of the attribute within the fragment
    pub attribute: String,
    pub message: String,
}

impl std::error::Error for EmitError {}

impl std::fmt::Display for EmitError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "attribute {:?}: {}", self.attribute, self.message)
    }
}

pub type EmitResult<T> = Result<T, EmitError>;

pub enum AttributeHook {
    Real,
    Int,
    UInt,
    Bool,
    Str,
    Pair,
    Quad,
    Enum(&'static EnumTable),
    RealOrEnum(&'static EnumTable),
    Pairs,
    IntPairs,
    Quads,
    Record(&'static FragmentSchema),
    Records {
        element_type: &'static str,
        element_var: &'static str,
        schema: &'static FragmentSchema,
    },
}

impl AttributeHook {
    fn is_nested(&self) -> bool {
        match self {
            AttributeHook::Record(_) | AttributeHook::Records { .. } => true,
            _ => false,
        }
    }
}

pub struct AttributeDef {
    pub name: &'static str,
    pub hook: AttributeHook,
}

pub struct FragmentSchema {
    /// Member the fragment's `transformer` table is written into, if the fragment has one
    pub transformer_member: Option<&'static str>,
    pub variant: Option<AttributeDef>,
    pub attributes: &'static [AttributeDef],
}

impl FragmentSchema {
    fn attribute(
        &self,
        name: &str,
    ) -> Option<&AttributeDef> {
        self.attributes.iter().find(|x| x.name == name)
    }
}

pub const TRANSFORMER_KEY: &str = "transformer";
pub const NAME_KEY: &str = "name";

fn error(
    attribute: &str,
    message: String,
) -> EmitError {
    EmitError {
        attribute: attribute.to_string(),
        message,
    }
}

fn nest_error(
    parent: &str,
    e: EmitError,
) -> EmitError {
    EmitError {
        attribute: format!("{}.{}", parent, e.attribute),
        message: e.message,
    }
}

fn scalar(
    hook: &AttributeHook,
    value: &Value,
) -> Option<Result<String, String>> {
    Some(match hook {
        AttributeHook::Real => literals::real(value),
        AttributeHook::Int => literals::int(value),
        AttributeHook::UInt => literals::uint(value),
        AttributeHook::Bool => literals::boolean(value),
        AttributeHook::Str => literals::string(value),
        AttributeHook::Pair => literals::pair(value),
        AttributeHook::Quad => literals::quad(value),
        AttributeHook::Enum(table) => literals::enum_constant(table, value),
        AttributeHook::RealOrEnum(table) => literals::real_or_enum(table, value),
        _ => return None,
    })
}

fn sequence_element(hook: &AttributeHook) -> Option<fn(&Value) -> Result<String, String>> {
    match hook {
        AttributeHook::Pairs => Some(literals::pair),
        AttributeHook::IntPairs => Some(literals::int_pair),
        AttributeHook::Quads => Some(literals::quad),
        _ => None,
    }
}

fn as_array<'a>(
    name: &str,
    value: &'a Value,
) -> EmitResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| error(name, format!("expected an array, found {}", value.type_str())))
}

fn as_table<'a>(
    name: &str,
    value: &'a Value,
) -> EmitResult<&'a Document> {
    value
        .as_table()
        .ok_or_else(|| error(name, format!("expected a table, found {}", value.type_str())))
}

fn emit_attribute(
    out: &mut String,
    def: &AttributeDef,
    value: &Value,
    var: &str,
    indent: Indent,
) -> EmitResult<()> {
    let target = format!("{}.{}", var, def.name);

    if let Some(literal) = scalar(&def.hook, value) {
        let literal = literal.map_err(|e| error(def.name, e))?;
        let _ = writeln!(out, "{}{} = {};", indent, target, literal);
        return Ok(());
    }

    if let Some(element) = sequence_element(&def.hook) {
        let elements = as_array(def.name, value)?;
        let _ = writeln!(out, "{}{}.reserve({});", indent, target, elements.len());
        for (i, x) in elements.iter().enumerate() {
            let literal = element(x).map_err(|e| error(&format!("{}[{}]", def.name, i), e))?;
            let _ = writeln!(out, "{}{}.push_back({});", indent, target, literal);
        }
        return Ok(());
    }

    match &def.hook {
        AttributeHook::Record(schema) => {
            let record = as_table(def.name, value)?;
            let text = emit_fragment(record, schema, &target, indent)
                .map_err(|e| nest_error(def.name, e))?;
            out.push_str(&text);
        }
        AttributeHook::Records {
            element_type,
            element_var,
            schema,
        } => {
            let records = as_array(def.name, value)?;
            let _ = writeln!(out, "{}{}.reserve({});", indent, target, records.len());
            for (i, x) in records.iter().enumerate() {
                let element_name = format!("{}[{}]", def.name, i);
                let record = as_table(&element_name, x)?;
                let _ = writeln!(out, "{}{{", indent);
                let _ = writeln!(out, "{}{} {};", indent.next(), element_type, element_var);
                let text = emit_fragment(record, schema, element_var, indent.next())
                    .map_err(|e| nest_error(&element_name, e))?;
                out.push_str(&text);
                let _ = writeln!(out, "{}{}.push_back(std::move({}));", indent.next(), target, element_var);
                let _ = writeln!(out, "{}}}", indent);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Emits assignments into `var` for every attribute of `fragment` that `schema` recognizes
pub fn emit_fragment(
    fragment: &Document,
    schema: &FragmentSchema,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    let mut out = String::new();

    if let Some(member) = schema.transformer_member {
        if let Some(value) = fragment.get(TRANSFORMER_KEY) {
            let transformer = as_table(TRANSFORMER_KEY, value)?;
            let text = emit_transformer(transformer, &format!("{}.{}", var, member), indent)
                .map_err(|e| nest_error(TRANSFORMER_KEY, e))?;
            out.push_str(&text);
        }
    }

    let variant_key = schema.variant.as_ref().map(|x| x.name);
    if let Some(variant) = &schema.variant {
        if let Some(value) = fragment.get(variant.name) {
            emit_attribute(&mut out, variant, value, var, indent)?;
        }
    }

    let is_skipped = |key: &str| {
        key == NAME_KEY || (schema.transformer_member.is_some() && key == TRANSFORMER_KEY) || Some(key) == variant_key
    };

    // Primary attributes
    for (key, value) in fragment {
        if is_skipped(key.as_str()) {
            continue;
        }

        match schema.attribute(key) {
            Some(def) if !def.hook.is_nested() => emit_attribute(&mut out, def, value, var, indent)?,
            Some(_) => {}
            None => log::debug!("{} ignores unrecognized key {:?}", var, key),
        }
    }

    // Nested sub-fragments
    for (key, value) in fragment {
        if is_skipped(key.as_str()) {
            continue;
        }

        if let Some(def) = schema.attribute(key) {
            if def.hook.is_nested() {
                emit_attribute(&mut out, def, value, var, indent)?;
            }
        }
    }

    Ok(out)
}

/// `var` is anything that exposes the transform fields, e.g. `params.local`
#[profiling::function]
pub fn emit_transformer(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_fragment(fragment, &TRANSFORMER_SCHEMA, var, indent)
}

/// Emits a scoped block that fills the kind's params struct and loads the renderable into `var`
#[profiling::function]
pub fn emit_renderable(
    kind: RenderableKind,
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{}{{", indent);
    let _ = writeln!(out, "{}eng::reg::params::{} params;", indent.next(), kind.type_name());
    out.push_str(&emit_fragment(fragment, kind.schema(), "params", indent.next())?);
    let _ = writeln!(
        out,
        "{}{} = eng::reg::{}(std::move(params));",
        indent.next(),
        var,
        kind.loader()
    );
    let _ = writeln!(out, "{}}}", indent);
    Ok(out)
}

pub fn emit_sprite(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::Sprite, fragment, var, indent)
}

pub fn emit_paragraph(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::Paragraph, fragment, var, indent)
}

pub fn emit_sprite_atlas(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::SpriteAtlas, fragment, var, indent)
}

pub fn emit_tilemap(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::Tilemap, fragment, var, indent)
}

pub fn emit_sprite_nonant(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::SpriteNonant, fragment, var, indent)
}

pub fn emit_ngon(
    fragment: &Document,
    var: &str,
    indent: Indent,
) -> EmitResult<String> {
    emit_renderable(RenderableKind::NGon, fragment, var, indent)
}
