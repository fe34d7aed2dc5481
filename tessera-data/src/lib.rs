pub use tessera_base::{HashMap, HashSet};

mod error;
pub use error::{DataError, DataResult};

mod meta;
pub use meta::{MetaRecord, MetaType, META_SIGIL};

pub mod descriptor;
pub use descriptor::Document;

pub mod defaults;
pub use defaults::fit_with_defaults;

pub mod schema;
pub use schema::{ImportKind, LiteralDefault, OptionDef};

#[cfg(test)]
mod tests;
