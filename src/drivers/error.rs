use thiserror::Error;
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("sample buffer capacity must be greater than zero")]
    ZeroCapacity,
    #[error("sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: f64, actual: f64 },
    #[error("digital bit count mismatch: {values} samples but {bits} bit masks")]
    BitsMismatch { values: usize, bits: usize },
}
