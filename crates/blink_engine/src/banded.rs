//! Banded linear systems.
//!
//! Spline collocation matrices have at most `degree + 1` non-zeros per row,
//! clustered around the diagonal. Gaussian elimination with partial pivoting
//! restricted to the band solves them in `O(n * kl * (kl + ku))`.

/// Square matrix with `kl` sub-diagonals and `ku` super-diagonals
///
/// Each row keeps the columns `[i - kl, i + ku + kl]`; the extra `kl`
/// columns on the right hold the fill-in produced by row exchanges.
#[derive(Debug, Clone)]
pub struct BandedMatrix {
    n: usize,
    kl: usize,
    ku: usize,
    width: usize,
    data: Vec<f64>,
}

impl BandedMatrix {
    pub fn zeros(n: usize, kl: usize, ku: usize) -> Self {
        let width = 2 * kl + ku + 1;
        Self {
            n,
            kl,
            ku,
            width,
            data: vec![0.0; n * width],
        }
    }

    /// Storage slot of `(i, j)`; `j` must lie in row `i`'s stored range
    #[inline]
    fn slot(&self, i: usize, j: usize) -> usize {
        debug_assert!(j + self.kl >= i && j <= i + self.ku + self.kl);
        i * self.width + (j + self.kl - i)
    }

    /// Set an entry inside the band
    ///
    /// # Panics
    /// `(i, j)` outside `[i - kl, i + ku]`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.n && j < self.n && j + self.kl >= i && j <= i + self.ku,
            "({i}, {j}) outside band kl={} ku={}",
            self.kl,
            self.ku
        );
        let s = self.slot(i, j);
        self.data[s] = value;
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.slot(i, j)]
    }

    /// Solve `A x = rhs`, consuming the matrix
    ///
    /// Returns `None` when a pivot is zero or not finite.
    pub fn solve(mut self, rhs: &[f64]) -> Option<Vec<f64>> {
        let n = self.n;
        debug_assert_eq!(rhs.len(), n);
        let mut b = rhs.to_vec();
        let reach = self.ku + self.kl;

        for c in 0..n {
            let last_row = (c + self.kl).min(n - 1);
            let last_col = (c + reach).min(n - 1);

            let (pivot_row, pivot) = (c..=last_row)
                .map(|r| (r, self.get(r, c)))
                .fold((c, 0.0_f64), |best, (r, v)| {
                    if v.abs() > best.1.abs() {
                        (r, v)
                    } else {
                        best
                    }
                });
            if pivot == 0.0 || !pivot.is_finite() {
                return None;
            }

            if pivot_row != c {
                for j in c..=last_col {
                    let (a, p) = (self.slot(c, j), self.slot(pivot_row, j));
                    self.data.swap(a, p);
                }
                b.swap(c, pivot_row);
            }

            for r in c + 1..=last_row {
                let factor = self.get(r, c) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in c..=last_col {
                    let s = self.slot(r, j);
                    self.data[s] -= factor * self.get(c, j);
                }
                b[r] -= factor * b[c];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let last_col = (i + reach).min(n - 1);
            let tail: f64 = (i + 1..=last_col).map(|j| self.get(i, j) * x[j]).sum();
            x[i] = (b[i] - tail) / self.get(i, i);
        }
        Some(x)
    }
}
