//! Regularised least squares
//!
//! `SymmetricSystem` accumulates the normal equations `XᵀX β = Xᵀy` row by
//! row, takes a per-coefficient ridge penalty on the diagonal and solves with a
//! Cholesky factorisation. Systems here are small (tens of coefficients), so a
//! dense row-major matrix is enough.

use crate::{MathError, Result};

/// Normal equations of a least-squares problem
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricSystem {
    dim: usize,
    lhs: Vec<f64>,
    rhs: Vec<f64>,
}

impl SymmetricSystem {
    /// Create an empty system with `dim` coefficients
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(MathError::InvalidInput(
                "System dimension must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            dim,
            lhs: vec![0.0; dim * dim],
            rhs: vec![0.0; dim],
        })
    }

    /// Number of coefficients
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Add one observation `target ≈ row · β`
    pub fn add_row(&mut self, row: &[f64], target: f64) -> Result<()> {
        if row.len() != self.dim {
            return Err(MathError::InvalidInput(format!(
                "Row has {} entries, system expects {}",
                row.len(),
                self.dim
            )));
        }

        for i in 0..self.dim {
            if row[i] == 0.0 {
                continue;
            }
            self.rhs[i] += row[i] * target;
            for j in i..self.dim {
                self.lhs[i * self.dim + j] += row[i] * row[j];
            }
        }

        Ok(())
    }

    /// Copy of the system with `penalties[i]` added to the i-th diagonal entry
    pub fn with_ridge(&self, penalties: &[f64]) -> Result<Self> {
        if penalties.len() != self.dim {
            return Err(MathError::InvalidInput(format!(
                "Got {} penalties for a system of dimension {}",
                penalties.len(),
                self.dim
            )));
        }

        let mut penalised = self.clone();
        for (i, &penalty) in penalties.iter().enumerate() {
            if penalty < 0.0 || !penalty.is_finite() {
                return Err(MathError::InvalidInput(format!(
                    "Ridge penalty {} at index {} must be finite and non-negative",
                    penalty, i
                )));
            }
            penalised.lhs[i * self.dim + i] += penalty;
        }

        Ok(penalised)
    }

    /// Cholesky factor of the left-hand side
    pub fn factor(&self) -> Result<Cholesky> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                // Only the upper triangle is accumulated
                let mut sum = self.lhs[j * n + i];
                for k in 0..j {
                    sum -= lower[i * n + k] * lower[j * n + k];
                }

                if i == j {
                    if sum <= 0.0 || !sum.is_finite() {
                        return Err(MathError::CalculationError(format!(
                            "System is not positive definite at pivot {}",
                            i
                        )));
                    }
                    lower[i * n + i] = sum.sqrt();
                } else {
                    lower[i * n + j] = sum / lower[j * n + j];
                }
            }
        }

        Ok(Cholesky { dim: n, lower })
    }

    /// Solve the system for β
    pub fn solve(&self) -> Result<Vec<f64>> {
        self.factor()?.solve(&self.rhs)
    }
}

/// Lower-triangular factor `L` with `A = L Lᵀ`
#[derive(Debug, Clone, PartialEq)]
pub struct Cholesky {
    dim: usize,
    lower: Vec<f64>,
}

impl Cholesky {
    fn forward(&self, b: &[f64]) -> Result<Vec<f64>> {
        if b.len() != self.dim {
            return Err(MathError::InvalidInput(format!(
                "Vector has {} entries, factor expects {}",
                b.len(),
                self.dim
            )));
        }

        let n = self.dim;
        let mut z = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= self.lower[i * n + k] * z[k];
            }
            z[i] = sum / self.lower[i * n + i];
        }

        Ok(z)
    }

    /// Solve `A x = b`
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.dim;
        let z = self.forward(b)?;

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = z[i];
            for k in i + 1..n {
                sum -= self.lower[k * n + i] * x[k];
            }
            x[i] = sum / self.lower[i * n + i];
        }

        Ok(x)
    }

    /// `cᵀ A⁻¹ c`, the variance of `cᵀβ` when `A⁻¹` is a covariance
    pub fn inverse_quadratic(&self, c: &[f64]) -> Result<f64> {
        let z = self.forward(c)?;
        Ok(z.iter().map(|v| v * v).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_fit() {
        // y = 1 + 2x
        let mut system = SymmetricSystem::new(2).unwrap();
        for x in 0..5 {
            let x = x as f64;
            system.add_row(&[1.0, x], 1.0 + 2.0 * x).unwrap();
        }

        let beta = system.solve().unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_ridge_shrinks_towards_zero() {
        let mut system = SymmetricSystem::new(1).unwrap();
        system.add_row(&[1.0], 4.0).unwrap();

        // (1 + 1) β = 4
        let beta = system.with_ridge(&[1.0]).unwrap().solve().unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-12);
        assert!(system.with_ridge(&[-1.0]).is_err());
    }

    #[test]
    fn test_singular_system_needs_ridge() {
        let mut system = SymmetricSystem::new(2).unwrap();
        system.add_row(&[1.0, 1.0], 2.0).unwrap();
        system.add_row(&[2.0, 2.0], 4.0).unwrap();

        assert!(system.solve().is_err());
        let beta = system.with_ridge(&[1e-6, 1e-6]).unwrap().solve().unwrap();
        assert_relative_eq!(beta[0] + beta[1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_inverse_quadratic() {
        // A = diag(4, 9) so eᵢᵀ A⁻¹ eᵢ = 1/4, 1/9
        let mut system = SymmetricSystem::new(2).unwrap();
        system.add_row(&[2.0, 0.0], 0.0).unwrap();
        system.add_row(&[0.0, 3.0], 0.0).unwrap();

        let factor = system.factor().unwrap();
        assert_relative_eq!(factor.inverse_quadratic(&[1.0, 0.0]).unwrap(), 0.25);
        assert_relative_eq!(factor.inverse_quadratic(&[0.0, 1.0]).unwrap(), 1.0 / 9.0);
    }

    #[test]
    fn test_row_length_checked() {
        let mut system = SymmetricSystem::new(2).unwrap();
        assert!(system.add_row(&[1.0], 1.0).is_err());
        assert!(SymmetricSystem::new(0).is_err());
    }
}
