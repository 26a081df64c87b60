use std::f32::consts::PI;
use std::str::FromStr;

use crate::error::SpectrogramError;

/// Window shapes applied to a segment before the FFT.
///
/// `Blackman` and `Gauss` take an extra shape parameter in (0, 1); the rest
/// ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WindowShape {
    Rectangular,
    Triangular,
    Bartlett,
    BartlettHann,
    Blackman,
    Cosine,
    Gauss,
    Hamming,
    #[default]
    Hann,
    Lanczos,
}

impl FromStr for WindowShape {
    type Err = SpectrogramError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "rectangular" => Ok(Self::Rectangular),
            "triangular" => Ok(Self::Triangular),
            "bartlett" => Ok(Self::Bartlett),
            "bartlettHann" => Ok(Self::BartlettHann),
            "blackman" => Ok(Self::Blackman),
            "cosine" => Ok(Self::Cosine),
            "gauss" => Ok(Self::Gauss),
            "hamming" => Ok(Self::Hamming),
            "hann" => Ok(Self::Hann),
            "lanczos" => Ok(Self::Lanczos),
            _ => Err(SpectrogramError::UnknownWindow(name.to_string())),
        }
    }
}

/// Compute the window coefficients for one FFT size.
///
/// Returns exactly `size` values. `alpha` is consulted only for `Blackman`
/// (default 0.16) and `Gauss` (default 0.25).
pub fn coefficients(shape: WindowShape, size: usize, alpha: Option<f32>) -> Vec<f32> {
    let n = size as f32;
    let last = n - 1.0;

    (0..size)
        .map(|i| {
            let i = i as f32;
            match shape {
                WindowShape::Rectangular => 1.0,
                WindowShape::Triangular => 2.0 / n * (n / 2.0 - (i - last / 2.0).abs()),
                WindowShape::Bartlett => 2.0 / last * (last / 2.0 - (i - last / 2.0).abs()),
                WindowShape::BartlettHann => {
                    0.62 - 0.48 * (i / last - 0.5).abs() - 0.38 * (2.0 * PI * i / last).cos()
                }
                WindowShape::Blackman => {
                    let a = alpha.unwrap_or(0.16);
                    (1.0 - a) / 2.0 - 0.5 * (2.0 * PI * i / last).cos()
                        + a / 2.0 * (4.0 * PI * i / last).cos()
                }
                WindowShape::Cosine => (PI * i / last - PI / 2.0).cos(),
                WindowShape::Gauss => {
                    let a = alpha.unwrap_or(0.25);
                    (-0.5 * ((i - last / 2.0) / (a * last / 2.0)).powi(2)).exp()
                }
                WindowShape::Hamming => 0.54 - 0.46 * (2.0 * PI * i / last).cos(),
                WindowShape::Hann => 0.5 * (1.0 - (2.0 * PI * i / last).cos()),
                WindowShape::Lanczos => sinc(2.0 * i / last - 1.0),
            }
        })
        .collect()
}

/// Normalized sinc, with the x = 0 limit special-cased (hit at the exact
/// midpoint of odd-sized windows).
fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SHAPES: [WindowShape; 10] = [
        WindowShape::Rectangular,
        WindowShape::Triangular,
        WindowShape::Bartlett,
        WindowShape::BartlettHann,
        WindowShape::Blackman,
        WindowShape::Cosine,
        WindowShape::Gauss,
        WindowShape::Hamming,
        WindowShape::Hann,
        WindowShape::Lanczos,
    ];

    #[test]
    fn every_shape_has_requested_length() {
        for shape in ALL_SHAPES {
            assert_eq!(coefficients(shape, 64, None).len(), 64, "{shape:?}");
        }
    }

    #[test]
    fn rectangular_is_flat() {
        assert!(coefficients(WindowShape::Rectangular, 32, None)
            .iter()
            .all(|&v| v == 1.0));
    }

    #[test]
    fn hann_size_four() {
        let w = coefficients(WindowShape::Hann, 4, None);
        let expected = [0.0, 0.75, 0.75, 0.0];
        for (got, want) in w.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn lanczos_midpoint_of_odd_window_is_one() {
        let w = coefficients(WindowShape::Lanczos, 5, None);
        assert_eq!(w[2], 1.0);
        assert!(w.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn blackman_alpha_default_matches_explicit() {
        let implicit = coefficients(WindowShape::Blackman, 16, None);
        let explicit = coefficients(WindowShape::Blackman, 16, Some(0.16));
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn unknown_shape_name_is_rejected() {
        let err = "welch".parse::<WindowShape>().unwrap_err();
        assert!(err.to_string().contains("welch"));
    }

    #[test]
    fn known_shape_names_parse() {
        assert_eq!(
            "bartlettHann".parse::<WindowShape>().unwrap(),
            WindowShape::BartlettHann
        );
        assert_eq!("hann".parse::<WindowShape>().unwrap(), WindowShape::Hann);
    }
}
