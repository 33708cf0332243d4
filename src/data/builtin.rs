use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::math::matrix::Matrix;

/// The XOR truth table as a single batch: a `2 x 4` input (one sample per
/// column) and the matching `1 x 4` expected output.
pub fn xor() -> (Matrix, Matrix) {
    let table = [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)];
    let mut input = Matrix::zeros(2, table.len());
    let mut expected = Matrix::zeros(1, table.len());
    for (c, &(a, b)) in table.iter().enumerate() {
        input.set(0, c, a);
        input.set(1, c, b);
        expected.set(0, c, if a != b { 1.0 } else { 0.0 });
    }
    (input, expected)
}

/// `n` samples of 2D "two blobs" data, classes alternating 0 and 1.
/// Class 0 sits around (0.3, 0.3) and class 1 around (0.7, 0.7).
pub fn blobs(n: usize) -> Result<Dataset> {
    let centers = [(0.3f64, 0.3f64), (0.7f64, 0.7f64)];
    let mut data = Vec::with_capacity(n * 3);
    for i in 0..n {
        let class = i % 2;
        let (cx, cy) = centers[class];
        // Deterministic spread from the sample index.
        let angle = i as f64 * 2.399;
        let r = 0.12 * (i as f64 * 0.31).sin().abs();
        data.push(class as f64);
        data.push((cx + r * angle.cos()).clamp(0.0, 1.0));
        data.push((cy + r * angle.sin()).clamp(0.0, 1.0));
    }
    Dataset::from_samples(Matrix::from_vec(n, 3, data)?, 2)
}
