//! # System Module
//!
//! Phase assessment for an MSP business.
//!
//! The assessment logic is pure and deterministic: a revenue band and the
//! systems checklist go in, a phase, reading range, risk level and
//! recommendation list come out.

mod phase;

pub use phase::*;
