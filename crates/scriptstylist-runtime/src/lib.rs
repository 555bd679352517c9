//! Runtime session: owns one (script, character set) pair and keeps the
//! derived attribution views in step with every mutation.
//!
//! The session holds no hidden shared state; callers own it and drive it
//! explicitly.

pub mod session;
pub mod types;

pub use session::AnnotationSession;
pub use types::*;
