pub mod field_recovery;
pub mod text;

pub use field_recovery::{recover, FieldPattern, FieldRecovery, RecoveredFields};
pub use text::{clean_opt, clean_text, resolve_url};
