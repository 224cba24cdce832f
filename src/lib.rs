//! probtree: build, lay out and draw probability trees.
//!
//! An event with a fixed set of outcomes is repeated a number of times. Every
//! node of the resulting tree carries the cumulative probability of the outcome
//! sequence leading to it; every depth band sums to one.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
