pub mod fft;
pub mod resample;
pub mod spectrogram;
pub mod window;
