use super::{ImportContext, Importer};
use tessera_data::defaults::{layered_defaults, resolve};
use tessera_data::schema::{
    check_registered_values, FONT_ATLAS_KEY, FONT_ATLAS_OPTIONS, FONT_ATLAS_SECTION, FONT_FACE_KEY,
    FONT_FACE_OPTIONS, FONT_FACE_SECTION, KERNING_KEY,
};
use tessera_data::{Document, MetaType};
use toml::Value;

pub const FONT_BODY_KEY: &str = "font";

fn default_face(context: &ImportContext) -> Document {
    layered_defaults(FONT_FACE_OPTIONS, context.project_defaults, FONT_FACE_SECTION)
}

fn default_atlas(context: &ImportContext) -> Document {
    layered_defaults(FONT_ATLAS_OPTIONS, context.project_defaults, FONT_ATLAS_SECTION)
}

fn check_kerning(
    index: usize,
    entry: &Value,
) -> Option<String> {
    let Some(entry) = entry.as_table() else {
        return Some(format!("{} #{} should be a table", KERNING_KEY, index));
    };

    let pair_is_valid = entry
        .get("pair")
        .and_then(|x| x.as_array())
        .map(|x| x.len() == 2 && x.iter().all(|glyph| glyph.is_str()))
        .unwrap_or(false);
    if !pair_is_valid {
        return Some(format!(
            "{} #{} needs a pair of two glyphs",
            KERNING_KEY, index
        ));
    }

    if !entry.get("dist").map(|x| x.is_integer()).unwrap_or(false) {
        return Some(format!("{} #{} needs an integer dist", KERNING_KEY, index));
    }

    None
}

/// Side-cars for font faces: one face record, an ordered list of atlases rendered from the face,
/// and kerning pairs
#[derive(Default)]
pub struct FontImporter;

impl Importer for FontImporter {
    fn importer_name(&self) -> &'static str {
        "fonts"
    }

    fn supported_file_extensions(&self) -> &[&'static str] {
        &["ttf", "otf"]
    }

    fn meta_type(&self) -> MetaType {
        MetaType::Font
    }

    fn body_key(&self) -> &'static str {
        FONT_BODY_KEY
    }

    fn default_body(
        &self,
        context: &ImportContext,
    ) -> Document {
        let mut body = Document::new();
        body.insert(FONT_FACE_KEY.to_string(), Value::Table(default_face(context)));
        body.insert(
            FONT_ATLAS_KEY.to_string(),
            Value::Array(vec![Value::Table(default_atlas(context))]),
        );
        body.insert(KERNING_KEY.to_string(), Value::Array(Vec::default()));
        body
    }

    fn refresh_body(
        &self,
        context: &ImportContext,
        body: &mut Document,
    ) {
        match body.get_mut(FONT_FACE_KEY) {
            Some(Value::Table(face)) => {
                resolve(face, FONT_FACE_OPTIONS, context.project_defaults, FONT_FACE_SECTION)
            }
            _ => {
                body.insert(FONT_FACE_KEY.to_string(), Value::Table(default_face(context)));
            }
        }

        match body.get_mut(FONT_ATLAS_KEY) {
            Some(Value::Array(atlases)) => {
                for atlas in atlases.iter_mut() {
                    if let Value::Table(atlas) = atlas {
                        resolve(atlas, FONT_ATLAS_OPTIONS, context.project_defaults, FONT_ATLAS_SECTION);
                    }
                }
            }
            _ => {
                body.insert(
                    FONT_ATLAS_KEY.to_string(),
                    Value::Array(vec![Value::Table(default_atlas(context))]),
                );
            }
        }

        if !body.contains_key(KERNING_KEY) {
            body.insert(KERNING_KEY.to_string(), Value::Array(Vec::default()));
        }
    }

    fn check_body(
        &self,
        _context: &ImportContext,
        body: &Document,
    ) -> Vec<String> {
        let mut problems = Vec::default();

        if let Some(face) = body.get(FONT_FACE_KEY).and_then(|x| x.as_table()) {
            problems.extend(check_registered_values(face, FONT_FACE_OPTIONS));
        }

        let atlases = body
            .get(FONT_ATLAS_KEY)
            .and_then(|x| x.as_array())
            .map(|x| x.as_slice())
            .unwrap_or_default();
        for (index, atlas) in atlases.iter().enumerate() {
            let Some(atlas) = atlas.as_table() else {
                problems.push(format!("{} #{} should be a table", FONT_ATLAS_KEY, index));
                continue;
            };

            for problem in check_registered_values(atlas, FONT_ATLAS_OPTIONS) {
                problems.push(format!("{} #{}: {}", FONT_ATLAS_KEY, index, problem));
            }

            let uses_preset = atlas
                .get("use_common_buffer_preset")
                .and_then(|x| x.as_bool())
                .unwrap_or(true);
            if !uses_preset && !atlas.contains_key("common_buffer") {
                problems.push(format!(
                    "{} #{} does not use a buffer preset but has no common_buffer",
                    FONT_ATLAS_KEY, index
                ));
            }
        }

        let kerning = body
            .get(KERNING_KEY)
            .and_then(|x| x.as_array())
            .map(|x| x.as_slice())
            .unwrap_or_default();
        problems.extend(
            kerning
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| check_kerning(index, entry)),
        );

        problems
    }
}
