use super::{ArchetypeDescriptor, Renderable};
use crate::codegen_error::ArchetypeErrorKind;
use crate::emitter::{self, EmitError};
use crate::literals::Indent;
use crate::target::CodegenTarget;
use std::fmt::Write;

fn invalid_attribute(
    renderable: &str,
    e: EmitError,
) -> ArchetypeErrorKind {
    ArchetypeErrorKind::InvalidAttribute {
        renderable: renderable.to_string(),
        attribute: e.attribute,
        message: e.message,
    }
}

fn attach_all(
    out: &mut String,
    renderables: &[Renderable],
    indent: Indent,
) {
    for renderable in renderables {
        let _ = writeln!(
            out,
            "{}{}.attach_parent(&transformer);",
            indent,
            renderable.kind.attachment(&renderable.name)
        );
    }
}

fn copy_members(
    out: &mut String,
    descriptor: &ArchetypeDescriptor,
    indent: Indent,
) {
    let _ = writeln!(out, "{}transformer.set_local() = other.transformer.get_local();", indent);
    for renderable in &descriptor.renderables {
        let _ = writeln!(out, "{}{} = other.{}.clone();", indent, renderable.name, renderable.name);
    }
    attach_all(out, &descriptor.renderables, indent);
}

fn move_members(
    out: &mut String,
    descriptor: &ArchetypeDescriptor,
    indent: Indent,
) {
    let _ = writeln!(out, "{}transformer = std::move(other.transformer);", indent);
    for renderable in &descriptor.renderables {
        let _ = writeln!(
            out,
            "{}{} = std::move(other.{});",
            indent, renderable.name, renderable.name
        );
    }
    attach_all(out, &descriptor.renderables, indent);
}

fn constructor(
    out: &mut String,
    descriptor: &ArchetypeDescriptor,
    indent: Indent,
) -> Result<(), ArchetypeErrorKind> {
    let name = &descriptor.name;
    let inner = indent.next();
    let _ = writeln!(out, "{}{}::{}()", indent, name, name);
    let _ = writeln!(out, "{}{{", indent);

    // Local transform
    if let Some(transformer) = &descriptor.transformer {
        let text = emitter::emit_transformer(transformer, "transformer.set_local()", inner)
            .map_err(|e| invalid_attribute(emitter::TRANSFORMER_KEY, e))?;
        out.push_str(&text);
    }

    // Renderables
    for renderable in &descriptor.renderables {
        let text = emitter::emit_renderable(renderable.kind, &renderable.fragment, &renderable.name, inner)
            .map_err(|e| invalid_attribute(&renderable.name, e))?;
        out.push_str(&text);
    }

    // Parenting
    attach_all(out, &descriptor.renderables, inner);

    let _ = writeln!(out, "{}}}", indent);
    Ok(())
}

fn copy_and_move(
    out: &mut String,
    descriptor: &ArchetypeDescriptor,
    indent: Indent,
) {
    let name = &descriptor.name;
    let inner = indent.next();
    let guarded = inner.next();

    let _ = writeln!(out, "{}{}::{}(const {}& other)", indent, name, name, name);
    let _ = writeln!(out, "{}{{", indent);
    copy_members(out, descriptor, inner);
    let _ = writeln!(out, "{}}}", indent);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}& {}::operator=(const {}& other)", indent, name, name, name);
    let _ = writeln!(out, "{}{{", indent);
    let _ = writeln!(out, "{}if (this != &other)", inner);
    let _ = writeln!(out, "{}{{", inner);
    copy_members(out, descriptor, guarded);
    let _ = writeln!(out, "{}}}", inner);
    let _ = writeln!(out, "{}return *this;", inner);
    let _ = writeln!(out, "{}}}", indent);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}::{}({}&& other) noexcept", indent, name, name, name);
    let _ = writeln!(out, "{}{{", indent);
    move_members(out, descriptor, inner);
    let _ = writeln!(out, "{}}}", indent);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}{}& {}::operator=({}&& other) noexcept", indent, name, name, name);
    let _ = writeln!(out, "{}{{", indent);
    let _ = writeln!(out, "{}if (this != &other)", inner);
    let _ = writeln!(out, "{}{{", inner);
    move_members(out, descriptor, guarded);
    let _ = writeln!(out, "{}}}", inner);
    let _ = writeln!(out, "{}return *this;", inner);
    let _ = writeln!(out, "{}}}", indent);
}

fn methods(
    out: &mut String,
    descriptor: &ArchetypeDescriptor,
    indent: Indent,
) {
    let name = &descriptor.name;
    let inner = indent.next();

    if !descriptor.draw.is_empty() {
        let _ = writeln!(out, "{}void {}::draw() const", indent, name);
        let _ = writeln!(out, "{}{{", indent);
        for renderable in &descriptor.draw {
            let _ = writeln!(out, "{}{}->draw();", inner, renderable);
        }
        let _ = writeln!(out, "{}}}", indent);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}void {}::on_tick() const", indent, name);
    let _ = writeln!(out, "{}{{", indent);
    for renderable in descriptor.ticking_renderables() {
        let _ = writeln!(out, "{}{}->on_tick();", inner, renderable.name);
    }
    let _ = writeln!(out, "{}}}", indent);
}

#[profiling::function]
pub(super) fn generate_body(
    descriptor: &ArchetypeDescriptor,
    source: &str,
    header_file_name: &str,
) -> Result<String, ArchetypeErrorKind> {
    let indent = Indent(1);

    let mut out = String::new();
    let _ = writeln!(out, "{}", CodegenTarget::marker_line(source));
    let _ = writeln!(out, "#include \"{}\"", header_file_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "namespace eng::gen");
    let _ = writeln!(out, "{{");
    constructor(&mut out, descriptor, indent)?;
    let _ = writeln!(out);
    copy_and_move(&mut out, descriptor, indent);
    let _ = writeln!(out);
    methods(&mut out, descriptor, indent);
    let _ = writeln!(out, "}}");
    Ok(out)
}
