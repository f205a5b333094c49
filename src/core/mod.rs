//! Domain types parsed from a wiki change log.

pub mod edit;
pub mod errors;
pub mod record;

pub use edit::{Edit, EditKind};
pub use errors::{Error, Result, ResultExt};
pub use record::{ChangeRecord, Comment, Label, NULL_COMMENT, UNKNOWN_LABEL};
