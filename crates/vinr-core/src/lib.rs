//! Core library for vehicle plate OCR text processing.
//!
//! This crate provides:
//! - Text normalization for noisy OCR output (line splitting, keyword search)
//! - Rule-based field extraction (VIN, maker, manufacture year, model name)
//! - Sticker-area / VIN-area merge policy for two OCR passes
//! - Vehicle record and configuration models

pub mod error;
pub mod extract;
pub mod models;

pub use error::{ExtractionError, Result, VinrError};
pub use extract::{ExtractionResult, VehicleExtractor, VehicleInfoParser};
pub use models::vehicle::{ExtractedRecord, Field, ManufactureDate, TextSource, YearMonth};
