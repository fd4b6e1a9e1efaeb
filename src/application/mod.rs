//! Application layer orchestrating a tender run.
//!
//! `PricingEngine` walks the rule tree for every item, executes the bound
//! actions and applies the rounding pass. It is synchronous and holds no
//! state between runs.

pub mod engine;
