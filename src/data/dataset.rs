use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::csv::parse_csv;
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// A labelled dataset held as one row per sample, label in column 0.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Matrix,
    classes: usize,
    scale: f64,
}

/// One column-aligned training batch.
#[derive(Debug, Clone)]
pub struct Batch {
    /// `feature_dim x batch`
    pub input: Matrix,
    /// One-hot labels, `classes x batch`
    pub expected: Matrix,
    pub labels: Vec<usize>,
}

impl Dataset {
    /// Wraps an `N x (1 + F)` matrix. Column 0 must hold integer labels in
    /// `[0, classes)`.
    pub fn from_samples(samples: Matrix, classes: usize) -> Result<Dataset> {
        if samples.cols() < 2 {
            return Err(NetError::InvalidConfig(format!(
                "samples need a label column and at least one feature, got {} column(s)",
                samples.cols()
            )));
        }
        for i in 0..samples.rows() {
            let label = samples.get(i, 0);
            if label < 0.0 || label.fract() != 0.0 || label as usize >= classes {
                return Err(NetError::InvalidConfig(format!(
                    "sample {}: label {} is not a class index below {}",
                    i, label, classes
                )));
            }
        }
        Ok(Dataset { samples, classes, scale: 1.0 })
    }

    pub fn from_csv_str(text: &str, classes: usize) -> Result<Dataset> {
        Dataset::from_samples(parse_csv(text, classes)?, classes)
    }

    pub fn load_csv<P: AsRef<Path>>(path: P, classes: usize) -> Result<Dataset> {
        let text = std::fs::read_to_string(path)?;
        Dataset::from_csv_str(&text, classes)
    }

    /// Divides every feature by `scale` when batches are built, e.g. 255 for
    /// 8-bit pixels.
    pub fn with_scale(mut self, scale: f64) -> Result<Dataset> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(NetError::InvalidConfig(format!("feature scale must be positive, got {}", scale)));
        }
        self.scale = scale;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.samples.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.rows() == 0
    }

    pub fn feature_dim(&self) -> usize {
        self.samples.cols() - 1
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    pub fn label(&self, i: usize) -> usize {
        self.samples.get(i, 0) as usize
    }

    /// Scaled features of sample `i`.
    pub fn features(&self, i: usize) -> Vec<f64> {
        self.samples.row(i)[1..].iter().map(|x| x / self.scale).collect()
    }

    /// Reorders the samples in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        self.samples = self.samples.select_rows(&order);
    }

    /// Half-open `(start, end)` ranges covering the dataset in order. The
    /// last range is short when `batch_size` does not divide the length.
    pub fn batch_ranges(&self, batch_size: usize) -> Result<Vec<(usize, usize)>> {
        if batch_size == 0 {
            return Err(NetError::InvalidConfig("batch size must be at least 1".into()));
        }
        let n = self.len();
        Ok((0..n)
            .step_by(batch_size)
            .map(|start| (start, (start + batch_size).min(n)))
            .collect())
    }

    /// Builds the batch for samples `[start, end)`.
    ///
    /// The sample rows are transposed into columns and the label row is
    /// sliced off, leaving a `feature_dim x batch` input.
    pub fn batch(&self, start: usize, end: usize) -> Result<Batch> {
        let columns = self.samples.slice_rows(start, end)?.transpose();
        let mut input = columns.slice_rows(1, columns.rows())?;
        if self.scale != 1.0 {
            input.scale(1.0 / self.scale);
        }

        let labels: Vec<usize> = columns.row(0).iter().map(|&l| l as usize).collect();
        let mut expected = Matrix::zeros(self.classes, labels.len());
        for (c, &label) in labels.iter().enumerate() {
            expected.set(label, c, 1.0);
        }

        Ok(Batch { input, expected, labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> Dataset {
        Dataset::from_csv_str("2,10,20,30\n0,40,50,60\n1,70,80,90\n", 3).unwrap()
    }

    #[test]
    fn batch_drops_label_row_and_one_hot_encodes() {
        let batch = small().batch(0, 2).unwrap();
        assert_eq!(batch.input.shape(), (3, 2));
        assert_eq!(batch.input.row(0), &[10.0, 40.0]);
        assert_eq!(batch.input.row(2), &[30.0, 60.0]);
        assert_eq!(batch.labels, vec![2, 0]);
        assert_eq!(
            batch.expected,
            Matrix::from_rows(&[vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap()
        );
    }

    #[test]
    fn scale_divides_features_only() {
        let ds = small().with_scale(10.0).unwrap();
        let batch = ds.batch(2, 3).unwrap();
        assert_eq!(batch.labels, vec![1]);
        for (x, want) in batch.input.as_slice().iter().zip([7.0, 8.0, 9.0]) {
            assert_abs_diff_eq!(*x, want, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(ds.features(0)[2], 3.0, epsilon = 1e-12);
        assert!(small().with_scale(0.0).is_err());
    }

    #[test]
    fn batch_ranges_cover_everything() {
        let ds = small();
        assert_eq!(ds.batch_ranges(2).unwrap(), vec![(0, 2), (2, 3)]);
        assert_eq!(ds.batch_ranges(5).unwrap(), vec![(0, 3)]);
        assert!(ds.batch_ranges(0).is_err());
    }

    #[test]
    fn shuffle_keeps_labels_attached_to_features() {
        let mut ds = small();
        ds.shuffle(&mut StdRng::seed_from_u64(5));
        assert_eq!(ds.len(), 3);
        for i in 0..ds.len() {
            let expected_first = match ds.label(i) {
                2 => 10.0,
                0 => 40.0,
                1 => 70.0,
                other => panic!("unexpected label {}", other),
            };
            assert_eq!(ds.features(i)[0], expected_first);
        }
    }

    #[test]
    fn out_of_range_batch_is_an_error() {
        assert!(small().batch(2, 4).is_err());
    }

    #[test]
    fn labels_are_validated() {
        let m = Matrix::from_rows(&[vec![1.5, 0.0]]).unwrap();
        assert!(Dataset::from_samples(m, 3).is_err());
        let m = Matrix::from_rows(&[vec![0.0]]).unwrap();
        assert!(Dataset::from_samples(m, 3).is_err());
    }
}
