//! Marketplace engine: merit scoring, coverage matching, subscription
//! billing, and the professional/lead/support services built on top of them.

pub mod billing;
pub mod coverage;
pub mod leads;
pub mod merit;
pub mod professionals;
pub mod roster;
pub mod support;
