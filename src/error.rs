use thiserror::Error;

/// Errors surfaced by the spectrogram pipeline.
///
/// Everything here reflects caller misconfiguration or unusable input and is
/// detected eagerly, before any FFT work starts. Log-compression of a zero
/// magnitude is defined as clamping and never produces an error.
#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("no such window function '{0}'")]
    UnknownWindow(String),

    #[error("invalid FFT size {0}: must be a power of two greater than 1")]
    NonPowerOfTwoSize(usize),

    #[error("segment length {len} does not match FFT size {size}")]
    SegmentSizeMismatch { size: usize, len: usize },

    #[error("overlap {noverlap} must be smaller than the FFT size {size}")]
    OverlapTooLarge { size: usize, noverlap: usize },

    #[error("no spectrogram columns to resample: no complete segment fit in the sample buffer")]
    EmptySpectrogram,

    #[error("target column count must be greater than zero")]
    NoColumns,
}
