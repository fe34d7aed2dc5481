use crate::{DataError, DataResult, MetaRecord};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use toml::Value;

/// Body of a descriptor. Keys keep the order they were declared in.
pub type Document = toml::Table;

/// Reads only the first line of a descriptor. A file without a meta line has an empty meta record.
#[profiling::function]
pub fn meta(path: &Path) -> DataResult<MetaRecord> {
    let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut reader = std::io::BufReader::new(file);
    let mut first_line = String::new();
    reader
        .read_line(&mut first_line)
        .map_err(|e| DataError::read(path, e))?;

    Ok(MetaRecord::parse_line(&first_line).unwrap_or_default())
}

#[profiling::function]
pub fn load(path: &Path) -> DataResult<Document> {
    load_with_meta(path).map(|(_, document)| document)
}

pub fn load_with_meta(path: &Path) -> DataResult<(MetaRecord, Document)> {
    let contents = std::fs::read_to_string(path).map_err(|e| DataError::read(path, e))?;
    parse_descriptor(&contents).map_err(|message| DataError::Malformed {
        path: path.to_path_buf(),
        message,
    })
}

/// Splits off the meta line (if present) and parses the remaining body
pub fn parse_descriptor(contents: &str) -> Result<(MetaRecord, Document), String> {
    let (first_line, rest) = match contents.find('\n') {
        Some(index) => (&contents[..index], &contents[index + 1..]),
        None => (contents, ""),
    };

    match MetaRecord::parse_line(first_line) {
        Some(meta) => Ok((meta, parse_body(rest)?)),
        None => Ok((MetaRecord::default(), parse_body(contents)?)),
    }
}

/// Parses the tabular body of a descriptor.
///
/// Authored descriptors sometimes re-open a table after an array of tables was declared under it,
/// which strict TOML rejects. If strict parsing fails, every section is parsed on its own and the
/// sections are merged in order. The strict error is reported if that doesn't work either.
pub fn parse_body(body: &str) -> Result<Document, String> {
    let strict_error = match body.parse::<Document>() {
        Ok(document) => return Ok(document),
        Err(e) => e.to_string(),
    };

    let mut merged = Document::new();
    for section in split_sections(body) {
        let parsed = section
            .parse::<Document>()
            .map_err(|_| strict_error.clone())?;
        merge_documents(&mut merged, parsed);
    }

    log::debug!("Descriptor body required per-section parsing");
    Ok(merged)
}

fn is_section_header(line: &str) -> bool {
    let line = line.trim();
    let line = match line.find('#') {
        Some(index) => line[..index].trim_end(),
        None => line,
    };

    if !line.starts_with('[') || !line.ends_with(']') || line.len() < 3 {
        return false;
    }

    line.trim_start_matches('[')
        .trim_end_matches(']')
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ' ')
}

fn split_sections(body: &str) -> Vec<String> {
    let mut sections = vec![String::new()];
    for line in body.lines() {
        if is_section_header(line) {
            sections.push(String::new());
        }

        if let Some(section) = sections.last_mut() {
            section.push_str(line);
            section.push('\n');
        }
    }

    sections
}

/// Tables merge recursively, arrays of tables append, anything else is replaced. A table landing on
/// an array of tables merges into the array's last element, like a sub-table header does in TOML.
pub fn merge_documents(
    target: &mut Document,
    source: Document,
) {
    for (key, value) in source {
        match value {
            Value::Table(incoming) => {
                match target.get_mut(&key) {
                    Some(Value::Table(existing)) => {
                        merge_documents(existing, incoming);
                        continue;
                    }
                    Some(Value::Array(existing)) if existing.iter().all(|x| x.is_table()) => {
                        if let Some(Value::Table(last)) = existing.last_mut() {
                            merge_documents(last, incoming);
                            continue;
                        }
                    }
                    _ => {}
                }
                target.insert(key, Value::Table(incoming));
            }
            Value::Array(incoming) if incoming.iter().all(|x| x.is_table()) => {
                if let Some(Value::Array(existing)) = target.get_mut(&key) {
                    if existing.iter().all(|x| x.is_table()) {
                        existing.extend(incoming);
                        continue;
                    }
                }
                target.insert(key, Value::Array(incoming));
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}

pub fn to_descriptor_string(
    meta: &MetaRecord,
    document: &Document,
) -> Result<String, String> {
    let body = toml::to_string_pretty(document).map_err(|e| e.to_string())?;
    if meta.is_empty() {
        Ok(body)
    } else {
        Ok(format!("{}\n\n{}", meta.to_line(), body))
    }
}

/// Writes the descriptor, keeping any meta already on disk. Overrides win per key.
#[profiling::function]
pub fn dump(
    path: &Path,
    document: &Document,
    meta_overrides: Option<&MetaRecord>,
) -> DataResult<()> {
    let existing_meta = match meta(path) {
        Ok(existing_meta) => existing_meta,
        Err(e) if e.is_not_found() => MetaRecord::default(),
        Err(e) => return Err(e),
    };

    let merged_meta = match meta_overrides {
        Some(overrides) => existing_meta.merged_with(overrides),
        None => existing_meta,
    };

    let contents =
        to_descriptor_string(&merged_meta, document).map_err(|message| DataError::Serialize {
            path: path.to_path_buf(),
            message,
        })?;

    write_replacing(path, contents.as_bytes())
}

/// Writes next to the destination and renames over it, so a reader never observes a partial file
pub fn write_replacing(
    path: &Path,
    contents: &[u8],
) -> DataResult<()> {
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, contents).map_err(|e| DataError::io(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| DataError::io(path, e))
}
