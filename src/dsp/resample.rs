use crate::error::SpectrogramError;

/// Retime a spectrogram onto `target_columns` columns with a box filter.
///
/// Both time axes are treated as the unit interval split into equal pieces;
/// every output column accumulates each input column weighted by the overlap
/// of their pieces. Total energy per row is conserved, for upsampling and
/// downsampling alike, and resampling to the same column count is exact.
pub fn resample(
    matrix: &[Vec<u8>],
    target_columns: usize,
) -> Result<Vec<Vec<u8>>, SpectrogramError> {
    if matrix.is_empty() {
        return Err(SpectrogramError::EmptySpectrogram);
    }
    if target_columns == 0 {
        return Err(SpectrogramError::NoColumns);
    }

    let rows = matrix[0].len();
    let old_piece = 1.0 / matrix.len() as f64;
    let new_piece = 1.0 / target_columns as f64;

    let mut resampled = Vec::with_capacity(target_columns);

    for i in 0..target_columns {
        let new_start = i as f64 * new_piece;
        let new_end = new_start + new_piece;

        let mut column = vec![0.0f64; rows];

        for (j, old_column) in matrix.iter().enumerate() {
            let old_start = j as f64 * old_piece;
            let old_end = old_start + old_piece;

            if old_end <= new_start || new_end <= old_start {
                continue;
            }
            let overlap = old_end.min(new_end) - old_start.max(new_start);
            let weight = overlap / new_piece;

            for (acc, &value) in column.iter_mut().zip(old_column) {
                *acc += weight * value as f64;
            }
        }

        // Inputs are already byte-ranged; the clamp only guards accumulated
        // rounding from pushing past 255.
        resampled.push(
            column
                .into_iter()
                .map(|v| v.round().clamp(0.0, 255.0) as u8)
                .collect(),
        );
    }

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_is_rejected() {
        let err = resample(&[], 10).unwrap_err();
        assert!(matches!(err, SpectrogramError::EmptySpectrogram));
    }

    #[test]
    fn zero_target_columns_is_rejected() {
        let matrix = vec![vec![1u8, 2, 3]];
        let err = resample(&matrix, 0).unwrap_err();
        assert!(matches!(err, SpectrogramError::NoColumns));
    }

    #[test]
    fn identity_resample_reproduces_the_input() {
        let matrix = vec![vec![0u8, 10, 200], vec![255, 40, 7], vec![13, 99, 1]];
        assert_eq!(resample(&matrix, 3).unwrap(), matrix);
    }

    #[test]
    fn single_column_is_the_time_average() {
        let matrix = vec![vec![10u8, 0], vec![20, 0], vec![30, 255]];
        let out = resample(&matrix, 1).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0][0], 20); // mean of 10, 20, 30
        assert_eq!(out[0][1], 85); // mean of 0, 0, 255
    }

    #[test]
    fn integral_upsample_repeats_columns() {
        let matrix = vec![vec![5u8, 100], vec![50, 200]];
        let out = resample(&matrix, 4).unwrap();
        assert_eq!(out, vec![
            vec![5u8, 100],
            vec![5, 100],
            vec![50, 200],
            vec![50, 200],
        ]);
    }

    #[test]
    fn upsample_then_downsample_round_trips() {
        let matrix = vec![vec![12u8, 240], vec![60, 3], vec![128, 77]];
        let up = resample(&matrix, 7).unwrap();
        let back = resample(&up, 3).unwrap();

        for (col, orig) in back.iter().zip(&matrix) {
            for (&got, &want) in col.iter().zip(orig) {
                assert!(
                    (got as i16 - want as i16).abs() <= 2,
                    "got {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn downsample_conserves_row_energy() {
        let matrix: Vec<Vec<u8>> = (0..8).map(|i| vec![(i * 30) as u8]).collect();
        let out = resample(&matrix, 2).unwrap();

        // Each output column averages its quarter of the input; the overall
        // mean is preserved.
        let input_mean: f64 = matrix.iter().map(|c| c[0] as f64).sum::<f64>() / 8.0;
        let output_mean: f64 = out.iter().map(|c| c[0] as f64).sum::<f64>() / 2.0;
        assert!((input_mean - output_mean).abs() <= 1.0);
    }
}
