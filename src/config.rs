use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fft: FftConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct FftConfig {
    #[serde(default = "default_fft_samples")]
    pub fft_samples: usize,
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default)]
    pub alpha: Option<f32>,
    #[serde(default)]
    pub noverlap: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            fft_samples: default_fft_samples(),
            window: default_window(),
            alpha: None,
            noverlap: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
        }
    }
}

fn default_fft_samples() -> usize { 512 }
fn default_window() -> String { "hann".into() }
fn default_width() -> usize { 640 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
