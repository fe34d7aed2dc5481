use crate::MetaType;
use tessera_base::{ParamCategory, ParamRegistry, ParamValue};
use toml::Value;

//
// Recognized options for every importable asset kind. Each entry names the option, its literal
// default (if it has one), and the registry category its values must come from.
//

#[derive(Debug, Clone)]
pub enum LiteralDefault {
    Str(&'static str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl LiteralDefault {
    pub fn to_value(&self) -> Value {
        match self {
            LiteralDefault::Str(x) => Value::String(x.to_string()),
            LiteralDefault::Int(x) => Value::Integer(*x),
            LiteralDefault::Float(x) => Value::Float(*x),
            LiteralDefault::Bool(x) => Value::Boolean(*x),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionDef {
    pub name: &'static str,
    pub default: Option<LiteralDefault>,
    pub category: Option<ParamCategory>,
}

const fn option(
    name: &'static str,
    default: LiteralDefault,
    category: Option<ParamCategory>,
) -> OptionDef {
    OptionDef {
        name,
        default: Some(default),
        category,
    }
}

const fn optional(name: &'static str) -> OptionDef {
    OptionDef {
        name,
        default: None,
        category: None,
    }
}

const FILTER_NEAREST: i64 = 0x2600;
const FILTER_LINEAR: i64 = 0x2601;
const WRAP_CLAMP_TO_EDGE: i64 = 0x812F;

pub const RASTER_OPTIONS: &[OptionDef] = &[
    option("storage", LiteralDefault::Str("discard"), Some(ParamCategory::Storage)),
    option("generate_mipmaps", LiteralDefault::Bool(false), None),
    option("min_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("mag_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("wrap_s", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
    option("wrap_t", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
];

pub const VECTOR_OPTIONS: &[OptionDef] = &[
    option("storage", LiteralDefault::Str("discard"), Some(ParamCategory::Storage)),
    option("abstract_storage", LiteralDefault::Str("discard"), Some(ParamCategory::Storage)),
    option("svg_scale", LiteralDefault::Float(1.0), None),
    option("generate_mipmaps", LiteralDefault::Str("off"), Some(ParamCategory::MipmapPolicy)),
    option("min_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("mag_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("wrap_s", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
    option("wrap_t", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
];

// Animated images are usually pixel art
pub const GIF_OPTIONS: &[OptionDef] = &[
    option("storage", LiteralDefault::Str("discard"), Some(ParamCategory::Storage)),
    option("generate_mipmaps", LiteralDefault::Bool(false), None),
    option("min_filter", LiteralDefault::Int(FILTER_NEAREST), Some(ParamCategory::FilterMode)),
    option("mag_filter", LiteralDefault::Int(FILTER_NEAREST), Some(ParamCategory::FilterMode)),
    option("wrap_s", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
    option("wrap_t", LiteralDefault::Int(WRAP_CLAMP_TO_EDGE), Some(ParamCategory::WrapMode)),
];

pub const SPRITESHEET_OPTIONS: &[OptionDef] = &[
    option("rows", LiteralDefault::Int(1), None),
    option("cols", LiteralDefault::Int(1), None),
    optional("cell_width_override"),
    optional("cell_height_override"),
    option("delay_cs", LiteralDefault::Int(0), None),
    option("row_major", LiteralDefault::Bool(true), None),
    option("row_up", LiteralDefault::Bool(true), None),
];

pub const FONT_FACE_OPTIONS: &[OptionDef] = &[option(
    "storage",
    LiteralDefault::Str("discard"),
    Some(ParamCategory::Storage),
)];

pub const FONT_ATLAS_OPTIONS: &[OptionDef] = &[
    option("storage", LiteralDefault::Str("discard"), Some(ParamCategory::Storage)),
    option("font_size", LiteralDefault::Float(32.0), None),
    option("min_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("mag_filter", LiteralDefault::Int(FILTER_LINEAR), Some(ParamCategory::FilterMode)),
    option("generate_mipmaps", LiteralDefault::Bool(false), None),
    optional("common_buffer"),
    option(
        "common_buffer_preset",
        LiteralDefault::Str("alpha_numeric"),
        Some(ParamCategory::BufferPreset),
    ),
    option("use_common_buffer_preset", LiteralDefault::Bool(true), None),
];

pub const SPRITESHEET_KEY: &str = "spritesheet";
pub const SPRITESHEET_SECTION: &str = "texture.spritesheet";
pub const FONT_FACE_KEY: &str = "font_face";
pub const FONT_FACE_SECTION: &str = "font.font_face";
pub const FONT_ATLAS_KEY: &str = "font_atlas";
pub const FONT_ATLAS_SECTION: &str = "font.font_atlas";
pub const KERNING_KEY: &str = "kerning";

/// The kind of side-car body an asset file gets, chosen by its file extension
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Raster,
    Vector,
    Gif,
    Font,
}

impl ImportKind {
    pub const ALL: [ImportKind; 4] = [
        ImportKind::Raster,
        ImportKind::Vector,
        ImportKind::Gif,
        ImportKind::Font,
    ];

    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Raster => &["png", "jpg", "jpeg", "bmp", "tga"],
            ImportKind::Vector => &["svg"],
            ImportKind::Gif => &["gif"],
            ImportKind::Font => &["ttf", "otf"],
        }
    }

    pub fn from_extension(extension: &str) -> Option<ImportKind> {
        let extension = extension.to_ascii_lowercase();
        ImportKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.file_extensions().contains(&extension.as_str()))
    }

    /// Key of the body this kind owns inside a side-car
    pub fn body_key(&self) -> &'static str {
        match self {
            ImportKind::Raster | ImportKind::Vector | ImportKind::Gif => "texture",
            ImportKind::Font => "font",
        }
    }

    pub fn meta_type(&self) -> MetaType {
        match self {
            ImportKind::Raster | ImportKind::Vector | ImportKind::Gif => MetaType::Texture,
            ImportKind::Font => MetaType::Font,
        }
    }

    /// Section in the project defaults descriptor holding this kind's top-level options
    pub fn defaults_section(&self) -> &'static str {
        match self {
            ImportKind::Raster => "texture.raster",
            ImportKind::Vector => "texture.vector",
            ImportKind::Gif => "texture.gif",
            ImportKind::Font => FONT_FACE_SECTION,
        }
    }

    pub fn options(&self) -> &'static [OptionDef] {
        match self {
            ImportKind::Raster => RASTER_OPTIONS,
            ImportKind::Vector => VECTOR_OPTIONS,
            ImportKind::Gif => GIF_OPTIONS,
            ImportKind::Font => FONT_FACE_OPTIONS,
        }
    }
}

fn to_param_value(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Integer(x) => Some(ParamValue::Int(*x)),
        Value::String(x) => Some(ParamValue::Str(x.clone())),
        _ => None,
    }
}

/// Returns a description of every option whose value is not a registered parameter of the
/// option's category. Options without a category and absent options are not checked.
pub fn check_registered_values(
    record: &crate::Document,
    options: &[OptionDef],
) -> Vec<String> {
    let registry = ParamRegistry::global();
    let mut problems = Vec::default();
    for option in options {
        let (Some(category), Some(value)) = (option.category, record.get(option.name)) else {
            continue;
        };

        let registered = to_param_value(value)
            .map(|x| registry.is_registered_in(category, &x))
            .unwrap_or(false);

        if !registered {
            problems.push(format!(
                "option {:?} has value {} which is not a known {:?}",
                option.name, value, category
            ));
        }
    }

    problems
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extension_lookup() {
        assert_eq!(ImportKind::from_extension("PNG"), Some(ImportKind::Raster));
        assert_eq!(ImportKind::from_extension("svg"), Some(ImportKind::Vector));
        assert_eq!(ImportKind::from_extension("gif"), Some(ImportKind::Gif));
        assert_eq!(ImportKind::from_extension("otf"), Some(ImportKind::Font));
        assert_eq!(ImportKind::from_extension("toml"), None);
    }

    #[test]
    fn builtin_literals_are_registered() {
        for options in [
            RASTER_OPTIONS,
            VECTOR_OPTIONS,
            GIF_OPTIONS,
            SPRITESHEET_OPTIONS,
            FONT_FACE_OPTIONS,
            FONT_ATLAS_OPTIONS,
        ] {
            let defaults = crate::defaults::builtin_defaults(options);
            assert!(check_registered_values(&defaults, options).is_empty());
        }
    }

    #[test]
    fn unregistered_values_are_reported() {
        let mut record = crate::Document::new();
        record.insert("min_filter".to_string(), Value::Integer(0x1234));
        record.insert("storage".to_string(), Value::String("keep".to_string()));
        record.insert("wrap_s".to_string(), Value::String("Repeat".to_string()));
        let problems = check_registered_values(&record, RASTER_OPTIONS);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("min_filter"));
        assert!(problems[1].contains("wrap_s"));
    }
}
