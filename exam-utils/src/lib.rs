//! Driving-school exam rules
//!
//! ## Current API
//!
//! - Check and record theory/practical attempts
//! - Work out the penalty for an exhausted exam
//! - Validate exam records
//!
pub mod attempt;
pub mod error;
pub mod validation;
