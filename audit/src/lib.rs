pub mod check;
pub mod error;
pub mod patterns;
pub mod sections;

pub use check::{Line, Section, SectionResult};
pub use error::AuditError;
pub use sections::{run_audit, AuditPaths, AuditReport};
