//! Preprocessor execution engine
//!
//! - [`engine`]: tree-walking [`engine::Interpreter`]
//!
//! # Execution Model
//!
//! The interpreter walks the AST depth-first, left to right, in a single
//! pass. A caller-owned [`crate::definitions::Definitions`] is threaded
//! through the walk by exclusive reference, so a `@define` is seen by every
//! condition after it in file order and by nothing before it.
//!
//! Running a parsed tree cannot fail: every node kind is a variant of a
//! closed enum and is matched exhaustively.

pub mod engine;
