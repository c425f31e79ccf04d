//! Core layer - capability traits and the answer-kind registry.
//!
//! This module provides:
//! - [`AnswerValue`] / [`ExprValue`] - the contracts answer kinds implement
//!   for the host's storage layer and expression evaluator
//! - [`Value`] - plain exchange representation of stored content
//! - [`Uncast`] - raw text form of an answer
//! - [`AnswerTag`] - wire tags plus the tagged envelope codec

mod registry;
mod traits;

pub use registry::{empty_answer, read_answer, write_answer, AnswerTag};
pub use traits::{AnswerValue, ExprValue, Uncast, Value};
