use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spectro", about = "Render audio spectrograms as intensity matrices")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output file; a .pgm extension writes a grayscale image, anything else JSON
    #[arg(short, long, default_value = "spectrogram.json")]
    pub output: PathBuf,

    /// Display width in columns (typically the canvas pixel width)
    #[arg(long, default_value_t = 640)]
    pub width: usize,

    /// FFT size in samples, must be a power of two
    #[arg(long, default_value_t = 512)]
    pub fft_samples: usize,

    /// Overlap between segments in samples, must be < fft-samples
    /// (default: derived from the display width)
    #[arg(long)]
    pub noverlap: Option<usize>,

    /// Window function: rectangular, triangular, bartlett, bartlettHann,
    /// blackman, cosine, gauss, hamming, hann, lanczos
    #[arg(long, default_value = "hann")]
    pub window: String,

    /// Shape parameter for the blackman/gauss windows (0-1)
    #[arg(long)]
    pub alpha: Option<f32>,

    /// Precomputed frequency matrix (JSON file path or URL); skips decoding
    /// and the FFT, resampling the matrix straight to the display width
    #[arg(long)]
    pub frequencies: Option<String>,

    /// Config file path (default: auto-detected spectro.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
