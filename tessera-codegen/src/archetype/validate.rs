use super::ArchetypeDescriptor;
use crate::codegen_error::ArchetypeErrorKind;
use crate::HashSet;

/// Names that collide with members every generated archetype has
pub const RESERVED_NAMES: &[&str] = &[
    "transformer",
    "draw",
    "on_tick",
    "params",
    "frame_format",
    "_method",
    "_layer",
];

pub fn is_valid_archetype_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

pub fn is_valid_renderable_name(name: &str) -> bool {
    match name.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => !name.chars().any(char::is_whitespace),
        _ => false,
    }
}

/// Checks the naming rules. The first violation found is reported: the archetype name, then each
/// renderable in header order, then the draw list.
pub fn validate(descriptor: &ArchetypeDescriptor) -> Result<(), ArchetypeErrorKind> {
    if !is_valid_archetype_name(&descriptor.name) {
        return Err(ArchetypeErrorKind::InvalidArchetypeName(descriptor.name.clone()));
    }

    let mut seen = HashSet::default();
    for renderable in &descriptor.renderables {
        let name = renderable.name.as_str();
        if !is_valid_renderable_name(name) {
            return Err(ArchetypeErrorKind::InvalidRenderableName(name.to_string()));
        }

        if RESERVED_NAMES.contains(&name) {
            return Err(ArchetypeErrorKind::ReservedRenderableName(name.to_string()));
        }

        if !seen.insert(name) {
            return Err(ArchetypeErrorKind::DuplicateRenderableName(name.to_string()));
        }
    }

    for name in &descriptor.draw {
        if !seen.contains(name.as_str()) {
            return Err(ArchetypeErrorKind::UnknownDrawReference(name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn archetype_names() {
        assert!(is_valid_archetype_name("HelloBox"));
        assert!(is_valid_archetype_name("Box_2"));
        assert!(!is_valid_archetype_name("2Box"));
        assert!(!is_valid_archetype_name("_Box"));
        assert!(!is_valid_archetype_name("Hello Box"));
        assert!(!is_valid_archetype_name("Hello-Box"));
        assert!(!is_valid_archetype_name("Box.h"));
        assert!(!is_valid_archetype_name(""));
    }

    #[test]
    fn renderable_names() {
        assert!(is_valid_renderable_name("body"));
        assert!(is_valid_renderable_name("_shadow"));
        assert!(!is_valid_renderable_name("9lives"));
        assert!(!is_valid_renderable_name("left arm"));
        assert!(!is_valid_renderable_name("tab\tbed"));
        assert!(!is_valid_renderable_name(""));
    }
}
