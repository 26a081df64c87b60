use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::dsp::fft::FftPlan;
use crate::error::SpectrogramError;

/// Compressed spectrogram: one column of `size / 2` intensities per segment,
/// in time order, plus the loudest bin seen across all segments.
#[derive(Debug)]
pub struct Spectrogram {
    pub columns: Vec<Vec<u8>>,
    pub peak_bin: usize,
    pub peak_magnitude: f32,
}

/// Slice `samples` into overlapping segments, transform each and compress the
/// magnitudes into byte intensities.
///
/// When `noverlap` is `None` it is derived from `target_columns` so that
/// segment density tracks the display width rather than the FFT size.
/// Trailing samples shorter than one segment are dropped; a buffer shorter
/// than one segment yields zero columns.
pub fn build(
    plan: &FftPlan,
    samples: &[f32],
    noverlap: Option<usize>,
    target_columns: usize,
    progress: Option<&ProgressBar>,
) -> Result<Spectrogram, SpectrogramError> {
    let size = plan.size();

    let noverlap = match noverlap {
        Some(n) if n >= size => {
            return Err(SpectrogramError::OverlapTooLarge { size, noverlap: n })
        }
        Some(n) => n,
        None => derive_noverlap(size, samples.len(), target_columns),
    };
    let step = size - noverlap;

    let offsets: Vec<usize> = (0..)
        .map(|i| i * step)
        .take_while(|offset| offset + size <= samples.len())
        .collect();

    // Segments are independent; rayon keeps the collected columns in offset
    // order, which the resampler relies on.
    let spectra = offsets
        .par_iter()
        .map(|&offset| {
            let spectrum = plan.transform(&samples[offset..offset + size])?;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            Ok(spectrum)
        })
        .collect::<Result<Vec<_>, SpectrogramError>>()?;

    let mut peak_bin = 0;
    let mut peak_magnitude = 0.0f32;
    let mut columns = Vec::with_capacity(spectra.len());

    for spectrum in spectra {
        if spectrum.peak > peak_magnitude {
            peak_magnitude = spectrum.peak;
            peak_bin = spectrum.peak_bin;
        }
        columns.push(spectrum.bins.iter().map(|&m| compress(m)).collect());
    }

    Ok(Spectrogram {
        columns,
        peak_bin,
        peak_magnitude,
    })
}

/// Overlap that yields roughly one segment per display column:
/// `max(0, round(size - samples / columns))`, capped at `size - 1` so the
/// segment step never reaches zero.
pub fn derive_noverlap(size: usize, samples: usize, target_columns: usize) -> usize {
    let unique_per_column = samples as f32 / target_columns.max(1) as f32;
    let noverlap = (size as f32 - unique_per_column).round().max(0.0) as usize;
    noverlap.min(size - 1)
}

/// Log-compress one magnitude into a byte intensity.
///
/// `round(45 * log10(m))`, clamped to [0, 255] before the cast. Zero and
/// subnormal magnitudes push log10 toward -inf and land on the floor; the
/// clamp is the defined behavior, never an error.
fn compress(magnitude: f32) -> u8 {
    (45.0 * magnitude.log10()).round().clamp(0.0, 255.0) as u8
}
