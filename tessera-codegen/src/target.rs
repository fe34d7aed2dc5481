/// First line of every generated file, followed by the project-relative path of the descriptor
/// the file was generated from
pub const GENERATED_MARKER: &str = "// Generated from: ";

/// File naming for the engine's host language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenTarget {
    pub header_extension: String,
    pub body_extension: String,
}

impl Default for CodegenTarget {
    fn default() -> Self {
        CodegenTarget {
            header_extension: "h".to_string(),
            body_extension: "cpp".to_string(),
        }
    }
}

impl CodegenTarget {
    pub fn header_file_name(
        &self,
        archetype_name: &str,
    ) -> String {
        format!("{}.{}", archetype_name, self.header_extension)
    }

    pub fn body_file_name(
        &self,
        archetype_name: &str,
    ) -> String {
        format!("{}.{}", archetype_name, self.body_extension)
    }

    pub fn marker_line(descriptor: &str) -> String {
        format!("{}{}", GENERATED_MARKER, descriptor)
    }

    /// The descriptor a generated file claims to come from, if its first line is a marker
    pub fn parse_marker(first_line: &str) -> Option<&str> {
        first_line
            .trim_end_matches(|c: char| c == '\r' || c == '\n')
            .strip_prefix(GENERATED_MARKER)
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn marker_round_trip() {
        let line = CodegenTarget::marker_line("assets/HelloBox.toml");
        assert_eq!(
            CodegenTarget::parse_marker(&format!("{}\r\n", line)),
            Some("assets/HelloBox.toml")
        );
        assert_eq!(CodegenTarget::parse_marker("#pragma once"), None);
        assert_eq!(CodegenTarget::parse_marker(GENERATED_MARKER), None);
    }

    #[test]
    fn file_names_use_configured_extensions() {
        let target = CodegenTarget {
            header_extension: "hpp".to_string(),
            body_extension: "cc".to_string(),
        };
        assert_eq!(target.header_file_name("HelloBox"), "HelloBox.hpp");
        assert_eq!(target.body_file_name("HelloBox"), "HelloBox.cc");
    }
}
