//! Assembly of the validation rules to run
//!
//! The configuration lists named validation rules; the command line can disable
//! some of them or restrict the run to others. Assembly applies those filters
//! in configuration order and builds every validator of each surviving rule.

mod assembler;
mod validation_rule;

pub use assembler::{RuleFilters, assemble, is_included};
pub use validation_rule::ValidationRule;
