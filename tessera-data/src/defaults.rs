use crate::schema::OptionDef;
use crate::Document;

//
// Defaults are layered from the outside in:
//   1. literals in the option tables (schema.rs)
//   2. the project's asset_defaults descriptor
//   3. the values in the descriptor itself
// An inner layer always wins. Filling never overwrites a value that is already present.
//

/// Sets every key of `defaults` that `document` lacks. Never overwrites.
pub fn fit_with_defaults(
    document: &mut Document,
    defaults: &Document,
) {
    for (key, value) in defaults {
        if !document.contains_key(key) {
            document.insert(key.clone(), value.clone());
        }
    }
}

/// Built-in literal defaults for an option table. Options without a literal default are omitted.
pub fn builtin_defaults(options: &[OptionDef]) -> Document {
    let mut document = Document::new();
    for option in options {
        if let Some(default) = &option.default {
            document.insert(option.name.to_string(), default.to_value());
        }
    }
    document
}

/// Looks up a dotted section ("texture.raster") in the project defaults descriptor
pub fn find_section<'a>(
    project_defaults: &'a Document,
    section: &str,
) -> Option<&'a Document> {
    let mut current = project_defaults;
    for part in section.split('.') {
        current = current.get(part)?.as_table()?;
    }
    Some(current)
}

/// Project defaults for a kind restricted to recognized options, with built-in literals filled in
/// for anything the project leaves out.
pub fn layered_defaults(
    options: &[OptionDef],
    project_defaults: &Document,
    section: &str,
) -> Document {
    let mut layered = Document::new();
    if let Some(project_section) = find_section(project_defaults, section) {
        for (key, value) in project_section {
            if options.iter().any(|x| x.name == key) {
                layered.insert(key.clone(), value.clone());
            } else {
                log::warn!(
                    "Ignoring unrecognized option {:?} in asset defaults section [{}]",
                    key,
                    section
                );
            }
        }
    }

    fit_with_defaults(&mut layered, &builtin_defaults(options));
    layered
}

/// Fills a per-file record from the layered defaults for its kind
pub fn resolve(
    document: &mut Document,
    options: &[OptionDef],
    project_defaults: &Document,
    section: &str,
) {
    fit_with_defaults(document, &layered_defaults(options, project_defaults, section));
}
