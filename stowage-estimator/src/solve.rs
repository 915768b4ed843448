//! Dense symmetric solves for the normal equations, plus Lawson-Hanson NNLS.
//!
//! The systems here are small (one row/column per catalog item), so plain
//! Gaussian elimination with partial pivoting is enough. Singularity is
//! detected by comparing each pivot against a scale-relative tolerance and
//! reported as the index of the column whose pivot collapsed, which the
//! caller maps back to an item name.

use ndarray::{Array1, Array2};

/// Solves `g x = rhs` for symmetric positive semi-definite `g` by Gaussian
/// elimination with partial pivoting. `Err(j)` means column `j` had no
/// usable pivot: `g` is singular and the `j`-th unknown is unidentifiable.
pub(crate) fn solve_symmetric(g: &Array2<f64>, rhs: &Array1<f64>) -> Result<Array1<f64>, usize> {
    let n = g.nrows();
    debug_assert_eq!(g.ncols(), n);
    debug_assert_eq!(rhs.len(), n);
    if n == 0 {
        return Ok(Array1::zeros(0));
    }

    // Augmented working copy [g | rhs].
    let mut m = Array2::<f64>::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            m[[i, j]] = g[[i, j]];
        }
        m[[i, n]] = rhs[i];
    }

    let scale = g.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tol = (scale * n as f64 * f64::EPSILON).max(f64::MIN_POSITIVE);

    for k in 0..n {
        // Partial pivot: largest magnitude in column k, rows k..
        let mut pivot_row = k;
        for i in (k + 1)..n {
            if m[[i, k]].abs() > m[[pivot_row, k]].abs() {
                pivot_row = i;
            }
        }
        if m[[pivot_row, k]].abs() <= tol {
            return Err(k);
        }
        if pivot_row != k {
            for j in 0..=n {
                let tmp = m[[k, j]];
                m[[k, j]] = m[[pivot_row, j]];
                m[[pivot_row, j]] = tmp;
            }
        }
        for i in (k + 1)..n {
            let factor = m[[i, k]] / m[[k, k]];
            if factor == 0.0 {
                continue;
            }
            for j in k..=n {
                m[[i, j]] -= factor * m[[k, j]];
            }
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for k in (0..n).rev() {
        let mut acc = m[[k, n]];
        for j in (k + 1)..n {
            acc -= m[[k, j]] * x[j];
        }
        x[k] = acc / m[[k, k]];
    }
    Ok(x)
}

/// Lawson-Hanson active-set non-negative least squares over precomputed
/// normal equations `gram = AᵀA`, `atb = Aᵀb`. Returns `x ≥ 0` minimizing
/// `||Ax - b||₂`, or `Err(j)` if the passive-set system turned singular at
/// column `j`.
pub(crate) fn nnls(gram: &Array2<f64>, atb: &Array1<f64>) -> Result<Array1<f64>, usize> {
    let n = gram.nrows();
    let mut x = Array1::<f64>::zeros(n);
    let mut passive = vec![false; n];

    let scale = gram.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tol = (scale * n as f64 * f64::EPSILON).max(f64::MIN_POSITIVE);

    // Finite in exact arithmetic; the cap guards float cycling.
    let max_outer = 10 * n.max(1);
    for _ in 0..max_outer {
        // Gradient of the residual at the current x.
        let w = atb - &gram.dot(&x);
        let mut best: Option<usize> = None;
        for j in 0..n {
            if !passive[j] && w[j] > tol {
                if best.map_or(true, |b| w[j] > w[b]) {
                    best = Some(j);
                }
            }
        }
        let entering = match best {
            Some(j) => j,
            None => break,
        };
        passive[entering] = true;

        loop {
            let idx: Vec<usize> = (0..n).filter(|&j| passive[j]).collect();
            let p = idx.len();
            let mut sub_g = Array2::<f64>::zeros((p, p));
            let mut sub_b = Array1::<f64>::zeros(p);
            for (si, &i) in idx.iter().enumerate() {
                sub_b[si] = atb[i];
                for (sj, &j) in idx.iter().enumerate() {
                    sub_g[[si, sj]] = gram[[i, j]];
                }
            }
            let z = solve_symmetric(&sub_g, &sub_b).map_err(|sj| idx[sj])?;

            if z.iter().all(|&v| v > tol) {
                x.fill(0.0);
                for (si, &i) in idx.iter().enumerate() {
                    x[i] = z[si];
                }
                break;
            }

            // Step toward z only as far as feasibility allows, then drop the
            // variables that hit zero back to the active set.
            let mut alpha = f64::INFINITY;
            for (si, &i) in idx.iter().enumerate() {
                if z[si] <= tol {
                    let denom = x[i] - z[si];
                    if denom > 0.0 {
                        alpha = alpha.min(x[i] / denom);
                    }
                }
            }
            if !alpha.is_finite() {
                alpha = 0.0;
            }
            for (si, &i) in idx.iter().enumerate() {
                x[i] += alpha * (z[si] - x[i]);
            }
            for &i in &idx {
                if x[i] <= tol {
                    x[i] = 0.0;
                    passive[i] = false;
                }
            }
            if !passive[entering] {
                // The entering variable was driven straight back out.
                break;
            }
        }
    }
    Ok(x)
}
