pub mod hashing;
pub use hashing::{HashMap, HashSet};

pub mod params;
pub use params::{ParamCategory, ParamError, ParamRegistry, ParamValue};
