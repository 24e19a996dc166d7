//! Question-text classification.
//!
//! Two independent, pure classifiers: `bloom` assigns a Bloom's cognitive
//! level from ordered phrase/verb rule tables, `outcome` maps a question
//! to the best course outcome by keyword overlap and Jaccard similarity.
//! Both are total over arbitrary text — low confidence is a result, not
//! an error.

pub mod bloom;
pub mod outcome;
pub mod verbs;

pub use bloom::{classify, KlResult};
pub use outcome::{match_outcome, CoResult};
