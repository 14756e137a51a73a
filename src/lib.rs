//! kicad-lib-tables: generate KiCad project library tables from a library checkout
//!
//! A KiCad project that pulls its libraries in as a git submodule needs a
//! `sym-lib-table` and an `fp-lib-table` at the project root listing every
//! library in the checkout. This crate scans the checkout and writes both.
//!
//! # Layout
//!
//! ```text
//! <project>/                 project root, tables are written here
//!   sym-lib-table
//!   fp-lib-table
//!   <submodule>/             library checkout, the scan base
//!     symbols/**/*.kicad_sym
//!     footprints/**/*.pretty/
//! ```
//!
//! Every URI is written as `${KIPRJMOD}/<submodule>/...` so the project can be
//! moved or cloned elsewhere.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Configuration error types
//! - [`kicad`] — Library discovery, naming and table serialisation

pub mod config;
pub mod error;
pub mod kicad;
