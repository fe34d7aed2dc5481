use crate::{DataError, DataResult};
use std::fmt::Write;

/// First-line sigil that marks a descriptor's meta record
pub const META_SIGIL: &str = "#meta";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MetaType {
    Texture,
    Font,
    Archetype,
    Signal,
    AssetDefaults,
    ResFavorites,
}

impl MetaType {
    pub const ALL: [MetaType; 6] = [
        MetaType::Texture,
        MetaType::Font,
        MetaType::Archetype,
        MetaType::Signal,
        MetaType::AssetDefaults,
        MetaType::ResFavorites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaType::Texture => "texture",
            MetaType::Font => "font",
            MetaType::Archetype => "archetype",
            MetaType::Signal => "signal",
            MetaType::AssetDefaults => "asset_defaults",
            MetaType::ResFavorites => "res_favorites",
        }
    }

    pub fn parse(s: &str) -> DataResult<MetaType> {
        MetaType::ALL
            .iter()
            .copied()
            .find(|x| x.as_str() == s)
            .ok_or_else(|| DataError::UnknownMetaType(s.to_string()))
    }
}

/// The `key="value"` pairs of a meta line, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaRecord {
    entries: Vec<(String, String)>,
}

impl MetaRecord {
    pub fn with_type(meta_type: MetaType) -> Self {
        let mut meta = MetaRecord::default();
        meta.set("type", meta_type.as_str());
        meta
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overrides win per key; keys only present in self keep their position
    pub fn merged_with(
        &self,
        overrides: &MetaRecord,
    ) -> MetaRecord {
        let mut merged = self.clone();
        for (k, v) in overrides.iter() {
            merged.set(k, v);
        }
        merged
    }

    pub fn meta_type(&self) -> Option<DataResult<MetaType>> {
        self.get("type").map(MetaType::parse)
    }

    pub fn is_type(
        &self,
        meta_type: MetaType,
    ) -> bool {
        self.get("type") == Some(meta_type.as_str())
    }

    /// Parses a line of the form `#meta k1="v1" k2="v2"`. Returns None if the line does not start
    /// with the sigil. Tokens that are not well-formed pairs are skipped.
    pub fn parse_line(line: &str) -> Option<MetaRecord> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let rest = line.strip_prefix(META_SIGIL)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut meta = MetaRecord::default();
        let mut chars = rest.chars().peekable();
        loop {
            while chars.peek().map(|c| c.is_whitespace()).unwrap_or(false) {
                chars.next();
            }

            if chars.peek().is_none() {
                break;
            }

            let mut key = String::new();
            while let Some(&c) = chars.peek() {
                if c == '=' || c.is_whitespace() {
                    break;
                }
                key.push(c);
                chars.next();
            }

            if chars.peek() != Some(&'=') {
                log::warn!("Ignoring malformed meta token {:?}", key);
                continue;
            }
            chars.next();

            if chars.peek() != Some(&'"') {
                log::warn!("Ignoring unquoted meta value for key {:?}", key);
                while chars.peek().map(|c| !c.is_whitespace()).unwrap_or(false) {
                    chars.next();
                }
                continue;
            }
            chars.next();

            let mut value = String::new();
            let mut terminated = false;
            while let Some(c) = chars.next() {
                if c == '"' {
                    terminated = true;
                    break;
                }
                value.push(c);
            }

            if !terminated {
                log::warn!("Ignoring unterminated meta value for key {:?}", key);
                break;
            }

            if !key.is_empty() {
                meta.set(key, value);
            }
        }

        Some(meta)
    }

    pub fn to_line(&self) -> String {
        let mut line = META_SIGIL.to_string();
        for (k, v) in self.iter() {
            // Writing into a String cannot fail
            let _ = write!(line, " {}=\"{}\"", k, v);
        }
        line
    }
}
