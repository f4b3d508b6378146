pub mod downsampler;
pub mod error;
