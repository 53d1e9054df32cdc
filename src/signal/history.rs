use crate::error::{HarnessError, HarnessResult};

/// A tap delay embedding of a signal. Row `i` holds the window
/// `x[i..i + taps]` in reverse order, i.e newest sample first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryMatrix {
    /// Row major storage, `rows * taps` values.
    data: Vec<f64>,
    rows: usize,
    taps: usize,
}

impl HistoryMatrix {
    /// Embeds `x` using windows of `taps` samples. Fails if `taps` is
    /// zero or greater than the length of `x`.
    pub fn new(x: &[f64], taps: usize) -> HarnessResult<Self> {
        validate_taps(taps, x.len())?;
        let rows = x.len() - taps + 1;
        let mut data = Vec::with_capacity(rows * taps);
        for i in 0..rows {
            data.extend(x[i..i + taps].iter().rev());
        }
        Ok(HistoryMatrix { data, rows, taps })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn taps(&self) -> usize {
        self.taps
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.taps..(index + 1) * self.taps]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.taps)
    }
}

/// Returns an error unless `1 <= taps <= signal_len`.
pub fn validate_taps(taps: usize, signal_len: usize) -> HarnessResult<()> {
    if taps < 1 {
        return Err(HarnessError::validation("taps must be at least 1"));
    }
    if taps > signal_len {
        return Err(HarnessError::validation(format!(
            "taps ({}) larger than signal length ({})",
            taps, signal_len
        )));
    }
    Ok(())
}

/// Pulls a tap count into `1..=signal_len`, for callers that prefer
/// clamping and retrying over failing.
pub fn clamp_taps(taps: usize, signal_len: usize) -> usize {
    taps.min(signal_len).max(1)
}

/// Drops the first `taps - 1` samples so that the sequence lines up with
/// the rows of a `HistoryMatrix` built with the same tap count.
pub fn align(sequence: &[f64], taps: usize) -> HarnessResult<&[f64]> {
    validate_taps(taps, sequence.len())?;
    Ok(&sequence[taps - 1..])
}

/// Builds the history matrix of `x` along with `x` aligned to its rows.
pub fn embed(x: &[f64], taps: usize) -> HarnessResult<(HistoryMatrix, &[f64])> {
    let history = HistoryMatrix::new(x, taps)?;
    let aligned = align(x, taps)?;
    Ok((history, aligned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_row_order() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        for taps in 1..=x.len() {
            let history = HistoryMatrix::new(&x, taps).unwrap();
            assert_eq!(history.rows(), x.len() - taps + 1);
            assert_eq!(history.taps(), taps);
            assert_eq!(history.iter_rows().count(), history.rows());
            let mut expected_first: Vec<f64> = x[..taps].to_vec();
            expected_first.reverse();
            assert_eq!(history.row(0), &expected_first[..]);
        }

        let history = HistoryMatrix::new(&x, 3).unwrap();
        assert_eq!(history.row(4), &[6.0, 5.0, 4.0]);
        assert_eq!(history.row(7), &[9.0, 8.0, 7.0]);
    }

    #[test]
    fn test_align() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (history, aligned) = embed(&x, 2).unwrap();
        assert_eq!(aligned, &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(aligned.len(), history.rows());
        // The newest sample of each row is the aligned sample.
        for (row, value) in history.iter_rows().zip(aligned) {
            assert_eq!(row[0], *value);
        }
    }

    #[test]
    fn test_invalid_taps() {
        let x = [0.0; 8];
        assert!(matches!(
            HistoryMatrix::new(&x, 0),
            Err(HarnessError::Validation(_))
        ));
        assert!(matches!(
            HistoryMatrix::new(&x, x.len() + 10),
            Err(HarnessError::Validation(_))
        ));
        assert!(HistoryMatrix::new(&x, x.len()).is_ok());
        assert!(align(&x, 9).is_err());
    }

    #[test]
    fn test_clamp_taps() {
        assert_eq!(clamp_taps(0, 10), 1);
        assert_eq!(clamp_taps(5, 10), 5);
        assert_eq!(clamp_taps(20, 10), 10);
    }
}
