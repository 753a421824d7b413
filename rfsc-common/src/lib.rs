//! # RFSC Common Library
//!
//! Core of the RF spectrum characterization services:
//! - Analyzer export ingest (metadata, instantaneous spectrum, spectrogram)
//! - Spectrogram slicing by time instant
//! - Per-instant feature extraction and peak detection
//! - Error taxonomy and configuration loading

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod spectrogram;

pub use error::{Error, Result, Section};
pub use features::{CharacterizationResult, FeatureExtractor, PeakDetector};
pub use ingest::{ingest_bytes, ingest_path, ingest_str, SpectrumFile};
pub use spectrogram::{Cell, RenderExtent, Slice, SpectrogramMatrix};
