//! Harvest specification and optional harvest analyses
//!
//! `[HARVEST]` gives, for every projection year, how the harvest is
//! specified and the per-fleet value. A case may additionally run one
//! auxiliary calculation: a stock rebuilding target (`[REBUILD]`) or a
//! P-star overfishing probability analysis (`[PSTAR]`).

mod types;

#[cfg(test)]
mod tests;

pub use types::*;
