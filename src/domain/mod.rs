//! Domain model: tender items, rule configuration and the pure pricing
//! algorithms (conditions, threshold reduction, rounding).

pub mod case;
pub mod condition;
pub mod context;
pub mod item;
pub mod ports;
pub mod reduction;
pub mod rounding;
pub mod rule;
