//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `resolve`: Resolve and print every effective property
//! - `get`: Print the value of one property
//! - `explain`: Show where a property value comes from
//! - `tree`: Print the contributor tree
//! - `validate`: Validate a settings file
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod explain;
pub mod get;
pub mod resolve;
pub mod tree;
pub mod validate;

pub use completions::CompletionsCommand;
pub use explain::ExplainCommand;
pub use get::GetCommand;
pub use resolve::ResolveCommand;
pub use tree::TreeCommand;
pub use validate::ValidateCommand;
