use super::ArchetypeDescriptor;
use crate::literals::Indent;
use crate::target::CodegenTarget;
use std::fmt::Write;

#[profiling::function]
pub(super) fn generate_header(
    descriptor: &ArchetypeDescriptor,
    source: &str,
) -> String {
    let name = &descriptor.name;
    let class_indent = Indent(1);
    let member_indent = class_indent.next();

    let mut out = String::new();
    let _ = writeln!(out, "{}", CodegenTarget::marker_line(source));
    let _ = writeln!(out, "#pragma once");
    let _ = writeln!(out);
    let _ = writeln!(out, "#include \"Engine.h\"");
    let _ = writeln!(out);
    let _ = writeln!(out, "namespace eng::gen");
    let _ = writeln!(out, "{{");
    let _ = writeln!(out, "{}class {}", class_indent, name);
    let _ = writeln!(out, "{}{{", class_indent);
    let _ = writeln!(out, "{}eng::Transformer2D transformer;", member_indent);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}public:", class_indent);

    if !descriptor.renderables.is_empty() {
        for renderable in &descriptor.renderables {
            let _ = writeln!(
                out,
                "{}{} {};",
                member_indent,
                renderable.kind.handle_type(),
                renderable.name
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}{}();", member_indent, name);
    let _ = writeln!(out, "{}{}(const {}& other);", member_indent, name, name);
    let _ = writeln!(out, "{}{}& operator=(const {}& other);", member_indent, name, name);
    let _ = writeln!(out, "{}{}({}&& other) noexcept;", member_indent, name, name);
    let _ = writeln!(out, "{}{}& operator=({}&& other) noexcept;", member_indent, name, name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}eng::Transform2D get_local() const {{ return transformer.get_local(); }}",
        member_indent
    );
    let _ = writeln!(
        out,
        "{}eng::Transform2D& set_local() {{ return transformer.set_local(); }}",
        member_indent
    );
    let _ = writeln!(out);

    if !descriptor.draw.is_empty() {
        let _ = writeln!(out, "{}void draw() const;", member_indent);
    }
    let _ = writeln!(out, "{}void on_tick() const;", member_indent);

    let _ = writeln!(out, "{}}};", class_indent);
    let _ = writeln!(out, "}}");
    out
}
