use crate::hashing::HashMap;
use lazy_static::lazy_static;
use std::fmt::Display;

//
// Two-way mapping between the names shown to a user and the opaque values the engine consumes.
// Hardware constants are stored as integers, enumerations as short symbolic strings.
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Int(i64),
    Str(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(x) => Some(*x),
            ParamValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Int(_) => None,
            ParamValue::Str(x) => Some(x.as_str()),
        }
    }
}

impl Display for ParamValue {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ParamValue::Int(x) => write!(f, "{:#x}", x),
            ParamValue::Str(x) => write!(f, "\"{}\"", x),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamCategory {
    FilterMode,
    WrapMode,
    ModifierKey,
    Storage,
    MipmapPolicy,
    BufferPreset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    UnknownName(String),
    UnknownValue(i64),
    DuplicateName(String),
    DuplicateValue(ParamValue),
}

impl std::error::Error for ParamError {}

impl Display for ParamError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ParamError::UnknownName(name) => write!(f, "No parameter is registered with the name {:?}", name),
            ParamError::UnknownValue(value) => write!(f, "No parameter is registered with the value {:#x}", value),
            ParamError::DuplicateName(name) => write!(f, "Parameter name {:?} is already registered", name),
            ParamError::DuplicateValue(value) => write!(f, "Parameter value {} is already registered", value),
        }
    }
}

enum BuiltinValue {
    Int(i64),
    Str(&'static str),
}

const BUILTIN_PARAMS: &[(ParamCategory, &str, BuiltinValue)] = &[
    (ParamCategory::FilterMode, "Nearest", BuiltinValue::Int(0x2600)),
    (ParamCategory::FilterMode, "Linear", BuiltinValue::Int(0x2601)),
    (ParamCategory::FilterMode, "NearestMipmapNearest", BuiltinValue::Int(0x2700)),
    (ParamCategory::FilterMode, "LinearMipmapNearest", BuiltinValue::Int(0x2701)),
    (ParamCategory::FilterMode, "NearestMipmapLinear", BuiltinValue::Int(0x2702)),
    (ParamCategory::FilterMode, "LinearMipmapLinear", BuiltinValue::Int(0x2703)),
    (ParamCategory::WrapMode, "ClampToEdge", BuiltinValue::Int(0x812F)),
    (ParamCategory::WrapMode, "ClampToBorder", BuiltinValue::Int(0x812D)),
    (ParamCategory::WrapMode, "MirroredRepeat", BuiltinValue::Int(0x8370)),
    (ParamCategory::WrapMode, "Repeat", BuiltinValue::Int(0x2901)),
    (ParamCategory::WrapMode, "MirrorClampToEdge", BuiltinValue::Int(0x8743)),
    (ParamCategory::ModifierKey, "Shift", BuiltinValue::Int(0x1)),
    (ParamCategory::ModifierKey, "Ctrl", BuiltinValue::Int(0x2)),
    (ParamCategory::ModifierKey, "Alt", BuiltinValue::Int(0x4)),
    (ParamCategory::ModifierKey, "Super", BuiltinValue::Int(0x8)),
    (ParamCategory::ModifierKey, "CapsLock", BuiltinValue::Int(0x10)),
    (ParamCategory::ModifierKey, "NumLock", BuiltinValue::Int(0x20)),
    (ParamCategory::Storage, "Discard", BuiltinValue::Str("discard")),
    (ParamCategory::Storage, "Keep", BuiltinValue::Str("keep")),
    (ParamCategory::MipmapPolicy, "Off", BuiltinValue::Str("off")),
    (ParamCategory::MipmapPolicy, "Auto", BuiltinValue::Str("auto")),
    (ParamCategory::MipmapPolicy, "Manual", BuiltinValue::Str("manual")),
    (ParamCategory::BufferPreset, "Common", BuiltinValue::Str("common")),
    (ParamCategory::BufferPreset, "Alpha Numeric", BuiltinValue::Str("alpha_numeric")),
    (ParamCategory::BufferPreset, "Numeric", BuiltinValue::Str("numeric")),
    (ParamCategory::BufferPreset, "Alphabet", BuiltinValue::Str("alphabet")),
    (ParamCategory::BufferPreset, "Alphabet Lowercase", BuiltinValue::Str("alphabet_lowercase")),
    (ParamCategory::BufferPreset, "Alphabet Uppercase", BuiltinValue::Str("alphabet_uppercase")),
];

lazy_static! {
    static ref GLOBAL_PARAM_REGISTRY: ParamRegistry = ParamRegistry::with_builtin_params();
}

/// "alpha_numeric" -> "Alpha Numeric"
pub fn title_case(symbol: &str) -> String {
    symbol
        .split(|c: char| c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Default)]
pub struct ParamRegistry {
    by_name: HashMap<String, (ParamValue, ParamCategory)>,
    by_value: HashMap<ParamValue, String>,
    // Registration order, so category listings are stable
    ordered_names: Vec<String>,
}

impl ParamRegistry {
    /// Process-wide table seeded with the well-known engine identifiers. Read-only after init.
    pub fn global() -> &'static ParamRegistry {
        &GLOBAL_PARAM_REGISTRY
    }

    pub fn with_builtin_params() -> Self {
        let mut registry = ParamRegistry::default();
        for (category, name, value) in BUILTIN_PARAMS {
            let value = match value {
                BuiltinValue::Int(x) => ParamValue::Int(*x),
                BuiltinValue::Str(x) => ParamValue::Str(x.to_string()),
            };

            if let Err(e) = registry.register(*category, name, value) {
                log::error!("Failed to register built-in parameter: {}", e);
            }
        }

        registry
    }

    pub fn register(
        &mut self,
        category: ParamCategory,
        name: &str,
        value: ParamValue,
    ) -> Result<(), ParamError> {
        if self.by_name.contains_key(name) {
            return Err(ParamError::DuplicateName(name.to_string()));
        }

        if self.by_value.contains_key(&value) {
            return Err(ParamError::DuplicateValue(value));
        }

        self.by_name
            .insert(name.to_string(), (value.clone(), category));
        self.by_value.insert(value, name.to_string());
        self.ordered_names.push(name.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ordered_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_names.is_empty()
    }

    pub fn value(
        &self,
        name: &str,
    ) -> Result<ParamValue, ParamError> {
        self.by_name
            .get(name)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| ParamError::UnknownName(name.to_string()))
    }

    /// Unregistered symbolic values fall back to a title-cased rendering of the symbol. Unregistered
    /// integers have no sensible display name and are an error.
    pub fn name(
        &self,
        value: &ParamValue,
    ) -> Result<String, ParamError> {
        if let Some(name) = self.by_value.get(value) {
            return Ok(name.clone());
        }

        match value {
            ParamValue::Int(x) => Err(ParamError::UnknownValue(*x)),
            ParamValue::Str(x) => Ok(title_case(x)),
        }
    }

    pub fn category_of(
        &self,
        value: &ParamValue,
    ) -> Option<ParamCategory> {
        let name = self.by_value.get(value)?;
        self.by_name.get(name).map(|(_, category)| *category)
    }

    pub fn is_registered_in(
        &self,
        category: ParamCategory,
        value: &ParamValue,
    ) -> bool {
        self.category_of(value) == Some(category)
    }

    pub fn names_in_category(
        &self,
        category: ParamCategory,
    ) -> Vec<&str> {
        self.ordered_names
            .iter()
            .filter(|name| {
                self.by_name
                    .get(name.as_str())
                    .map(|(_, c)| *c == category)
                    .unwrap_or(false)
            })
            .map(|name| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_table_fully_registered() {
        let registry = ParamRegistry::global();
        assert_eq!(registry.len(), BUILTIN_PARAMS.len());
    }

    #[test]
    fn names_and_values_round_trip() {
        let registry = ParamRegistry::global();
        for name in registry.ordered_names.iter() {
            let value = registry.value(name).unwrap();
            assert_eq!(&registry.name(&value).unwrap(), name);
            assert_eq!(registry.value(&registry.name(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn well_known_constants() {
        let registry = ParamRegistry::global();
        assert_eq!(registry.value("Linear").unwrap(), ParamValue::Int(0x2601));
        assert_eq!(registry.value("MirrorClampToEdge").unwrap(), ParamValue::Int(0x8743));
        assert_eq!(registry.value("CapsLock").unwrap(), ParamValue::Int(0x10));
        assert_eq!(registry.name(&ParamValue::Int(0x812F)).unwrap(), "ClampToEdge");
        assert_eq!(registry.name(&"alpha_numeric".into()).unwrap(), "Alpha Numeric");
        assert_eq!(
            registry.category_of(&"manual".into()),
            Some(ParamCategory::MipmapPolicy)
        );
    }

    #[test]
    fn unregistered_values() {
        let registry = ParamRegistry::global();
        assert_eq!(registry.name(&"some_custom_mode".into()).unwrap(), "Some Custom Mode");
        assert_eq!(
            registry.name(&ParamValue::Int(0x1234)),
            Err(ParamError::UnknownValue(0x1234))
        );
        assert_eq!(
            registry.value("NotAThing"),
            Err(ParamError::UnknownName("NotAThing".to_string()))
        );
    }

    #[test]
    fn uniqueness_is_enforced() {
        let mut registry = ParamRegistry::default();
        registry
            .register(ParamCategory::Storage, "Keep", "keep".into())
            .unwrap();
        assert_eq!(
            registry.register(ParamCategory::Storage, "Keep", "other".into()),
            Err(ParamError::DuplicateName("Keep".to_string()))
        );
        assert_eq!(
            registry.register(ParamCategory::Storage, "Other", "keep".into()),
            Err(ParamError::DuplicateValue("keep".into()))
        );
    }

    #[test]
    fn category_listing_keeps_registration_order() {
        let registry = ParamRegistry::global();
        assert_eq!(
            registry.names_in_category(ParamCategory::WrapMode),
            vec!["ClampToEdge", "ClampToBorder", "MirroredRepeat", "Repeat", "MirrorClampToEdge"]
        );
    }
}
