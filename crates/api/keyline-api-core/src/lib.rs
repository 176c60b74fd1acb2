//! keyline-api-core: property paths, write targets and write batches (core, engine-agnostic)

pub mod bag;
pub mod property_path;
pub mod target;
pub mod write_ops;

pub use bag::{lookup, set_at_path, IntermediatePolicy, PropertyBag, WriteOutcome};
pub use property_path::{PathError, PropertyPath, DEFAULT_DELIMITER};
pub use target::PropertyTarget;
pub use write_ops::{WriteBatch, WriteOp};
