//! eligibility: decide whether a cart satisfies a declarative set of criteria
//!
//! criteria map dotted cart paths to conditions (plain values, comparisons,
//! `in` lists and nested `and`/`or`). see [`conditions`] for the engine and
//! [`config`] for named rules stored on disk.

pub mod cli;
pub mod conditions;
pub mod config;
