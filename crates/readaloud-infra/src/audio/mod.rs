//! Audio output adapters for the narrator.

pub mod rodio_sink;

pub use rodio_sink::RodioSink;
