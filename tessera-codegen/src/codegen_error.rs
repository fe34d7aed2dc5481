use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ArchetypeErrorKind {
    MalformedDescriptor(String),
    MissingArchetype,
    InvalidArchetypeName(String),
    InvalidRenderableName(String),
    ReservedRenderableName(String),
    DuplicateRenderableName(String),
    UnknownDrawReference(String),
    MalformedRenderable {
        kind: String,
        index: usize,
        message: String,
    },
    InvalidAttribute {
        renderable: String,
        attribute: String,
        message: String,
    },
}

impl ArchetypeErrorKind {
    /// True for violations of the archetype naming rules, as opposed to descriptors that can't be
    /// read or emitted at all
    pub fn is_schema_violation(&self) -> bool {
        match self {
            ArchetypeErrorKind::InvalidArchetypeName(_)
            | ArchetypeErrorKind::InvalidRenderableName(_)
            | ArchetypeErrorKind::ReservedRenderableName(_)
            | ArchetypeErrorKind::DuplicateRenderableName(_)
            | ArchetypeErrorKind::UnknownDrawReference(_) => true,
            _ => false,
        }
    }
}

impl core::fmt::Display for ArchetypeErrorKind {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            ArchetypeErrorKind::MalformedDescriptor(ref message) => {
                write!(fmt, "malformed descriptor: {}", message)
            }
            ArchetypeErrorKind::MissingArchetype => {
                write!(fmt, "descriptor has no [archetype] table with a name")
            }
            ArchetypeErrorKind::InvalidArchetypeName(ref name) => write!(
                fmt,
                "invalid archetype name {:?} (must start with a letter and contain only letters, digits and underscores)",
                name
            ),
            ArchetypeErrorKind::InvalidRenderableName(ref name) => write!(
                fmt,
                "invalid renderable name {:?} (must start with a letter or underscore and contain no whitespace)",
                name
            ),
            ArchetypeErrorKind::ReservedRenderableName(ref name) => {
                write!(fmt, "renderable name {:?} is reserved", name)
            }
            ArchetypeErrorKind::DuplicateRenderableName(ref name) => {
                write!(fmt, "renderable name {:?} is used more than once", name)
            }
            ArchetypeErrorKind::UnknownDrawReference(ref name) => {
                write!(fmt, "draw refers to {:?} which is not a declared renderable", name)
            }
            ArchetypeErrorKind::MalformedRenderable {
                ref kind,
                index,
                ref message,
            } => write!(fmt, "{} #{} is malformed: {}", kind, index, message),
            ArchetypeErrorKind::InvalidAttribute {
                ref renderable,
                ref attribute,
                ref message,
            } => write!(fmt, "{}: attribute {:?}: {}", renderable, attribute, message),
        }
    }
}

/// An archetype descriptor that could not be turned into source. Always tagged with the
/// descriptor's path.
#[derive(Debug, Clone, PartialEq)]
pub struct CodegenError {
    pub path: PathBuf,
    pub kind: ArchetypeErrorKind,
}

impl CodegenError {
    pub fn new(
        path: impl Into<PathBuf>,
        kind: ArchetypeErrorKind,
    ) -> Self {
        CodegenError {
            path: path.into(),
            kind,
        }
    }
}

impl std::error::Error for CodegenError {}

impl core::fmt::Display for CodegenError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        write!(fmt, "{}: {}", self.path.display(), self.kind)
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
