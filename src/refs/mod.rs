//! Git references (HEAD and the ref files it points through).

pub mod head;
pub mod resolver;

pub use head::{branch_from_target, HeadResolution};
pub use resolver::{RefStore, RefValue, ResolvedRef, MAX_REF_DEPTH};
