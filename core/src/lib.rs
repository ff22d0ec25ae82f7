//! Conversions from atomic systems into phonopy and pymatgen style structure models.

pub mod config;
pub mod dump;
pub mod error;
pub mod periodic_table;
pub mod properties;
pub mod prototype;
pub mod simbox;
pub mod source;
pub mod symbols;
pub mod system;
pub mod tools;
