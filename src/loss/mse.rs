use crate::{error::Result, math::matrix::Matrix};

/// Squared-error cost over a whole batch.
///
/// The cost is `0.5 * sum((predicted - expected)^2)` over every output of
/// every column. It is not divided by the batch size, so values are only
/// comparable between batches of equal size.
pub struct MseLoss;

impl MseLoss {
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        Ok(MseLoss::cost_of_error(&MseLoss::derivative(predicted, expected)?))
    }

    /// Gradient of the cost w.r.t. the prediction: `predicted - expected`.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        let mut error = predicted.clone();
        error.sub_in_place(expected)?;
        Ok(error)
    }

    /// Cost from an already computed `predicted - expected` matrix.
    pub fn cost_of_error(error: &Matrix) -> f64 {
        0.5 * error.squared_norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_sum_of_squares() {
        let p = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.5, 2.0]]).unwrap();
        let e = Matrix::from_rows(&[vec![0.0, 0.0], vec![0.5, 0.0]]).unwrap();
        assert_eq!(MseLoss::loss(&p, &e).unwrap(), 2.5);
        assert_eq!(
            MseLoss::derivative(&p, &e).unwrap(),
            Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap()
        );
    }

    #[test]
    fn shapes_must_agree() {
        assert!(MseLoss::loss(&Matrix::zeros(2, 3), &Matrix::zeros(2, 2)).is_err());
    }
}
