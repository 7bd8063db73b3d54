//! Page extraction: one captured frame in, narratable story text out.

pub mod encode;
pub mod extractor;
pub mod prompt;

pub use extractor::{ExtractorConfig, PageExtractor};
