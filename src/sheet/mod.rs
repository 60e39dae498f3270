//! The character sheet: one free-form nested document per store.

mod service;
mod template;

pub use service::{RemovalFailure, RemovalReport, SheetService};
pub use template::blank_sheet;
