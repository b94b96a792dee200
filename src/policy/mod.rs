//! Wrap policy for bashwrap.
//!
//! This module provides the configuration types ([`config`]) and the
//! evaluator ([`evaluator`]) that decides whether each incoming command is
//! wrapped or passed through.

pub mod config;
pub mod evaluator;
