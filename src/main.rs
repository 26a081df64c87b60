mod audio;
mod cli;
mod config;
mod dsp;
mod error;
mod export;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use dsp::fft::PlanCache;
use dsp::window::WindowShape;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect spectro.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("spectro.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("spectro").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("spectro").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.width == 640 { cli.width = cfg.output.width; }
            if cli.fft_samples == 512 { cli.fft_samples = cfg.fft.fft_samples; }
            if cli.window == "hann" { cli.window = cfg.fft.window; }
            if cli.alpha.is_none() { cli.alpha = cfg.fft.alpha; }
            if cli.noverlap.is_none() { cli.noverlap = cfg.fft.noverlap; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let format = export::Format::from_path(&cli.output);

    // Precomputed-matrix mode: skip decoding and the FFT entirely.
    if let Some(ref source) = cli.frequencies {
        log::info!("Loading precomputed frequencies from {}", source);
        let matrix = load_frequencies(source)?;
        log::info!(
            "Loaded matrix: {} columns x {} bins",
            matrix.len(),
            matrix.first().map_or(0, Vec::len)
        );

        let display = dsp::resample::resample(&matrix, cli.width)?;
        export::write_matrix(&cli.output, &display, format)?;
        log::info!("Done! Output: {}", cli.output.display());
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let shape: WindowShape = cli.window.parse()?;

    log::info!("spectro - audio spectrogram generator");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "FFT: {} samples, {} window, {} display columns",
        cli.fft_samples,
        cli.window,
        cli.width
    );

    // 1. Decode audio (channel 0)
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(input)?;

    // 2. Build (or reuse) the FFT plan
    let mut plans = PlanCache::default();
    let plan = plans.get_or_build(cli.fft_samples, audio_data.sample_rate, shape, cli.alpha)?;
    log::info!("Frequency resolution: {:.1} Hz/bin", plan.bin_resolution());

    let noverlap = match cli.noverlap {
        Some(n) => n,
        None => dsp::spectrogram::derive_noverlap(
            cli.fft_samples,
            audio_data.samples.len(),
            cli.width,
        ),
    };

    // 3. Sliced, windowed FFT pass over the sample buffer
    let segments = if noverlap < cli.fft_samples && audio_data.samples.len() >= cli.fft_samples {
        (audio_data.samples.len() - cli.fft_samples) / (cli.fft_samples - noverlap) + 1
    } else {
        0
    };
    log::info!("Computing spectrogram ({} segments, overlap {})...", segments, noverlap);

    let pb = ProgressBar::new(segments as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} segments ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let spectrogram = dsp::spectrogram::build(
        &plan,
        &audio_data.samples,
        Some(noverlap),
        cli.width,
        Some(&pb),
    )?;
    pb.finish_and_clear();

    if spectrogram.columns.is_empty() {
        log::warn!(
            "Audio is shorter than one FFT segment ({} samples); nothing to render",
            cli.fft_samples
        );
    } else {
        log::info!(
            "Spectrogram: {} columns, peak magnitude {:.3} at {:.0} Hz",
            spectrogram.columns.len(),
            spectrogram.peak_magnitude,
            spectrogram.peak_bin as f32 * plan.bin_resolution()
        );
    }

    // 4. Resample the time axis onto the display width
    let display = dsp::resample::resample(&spectrogram.columns, cli.width)?;

    // 5. Export
    export::write_matrix(&cli.output, &display, format)?;
    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}

/// Fetch a precomputed frequency matrix from a local file or an HTTP URL.
///
/// The wire shape is a JSON array of columns, each an array of byte
/// intensities.
fn load_frequencies(source: &str) -> Result<Vec<Vec<u8>>> {
    let data = if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::blocking::get(source)
            .with_context(|| format!("Failed to fetch frequencies from {source}"))?;
        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch frequencies from {}: HTTP {}",
                source,
                response.status()
            );
        }
        response
            .bytes()
            .context("Failed to read frequencies response")?
            .to_vec()
    } else {
        std::fs::read(source)
            .with_context(|| format!("Failed to read frequencies file: {source}"))?
    };

    serde_json::from_slice(&data).context("Failed to parse frequencies JSON")
}
