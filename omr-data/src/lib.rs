//! Aggregation engine for DSM2 BDO OMR scenario analysis.
//!
//! Everything here is a pure function of its inputs: observations go in,
//! derived tables come out, and nothing is cached between invocations.

pub mod ecdf;
pub mod pivot;
pub mod summary;
pub mod window;
