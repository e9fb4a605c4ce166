//! Mann-Whitney U (Wilcoxon rank-sum) test.
//!
//! The p-value method is picked automatically: the exact null distribution of U
//! is used when there are no ties and at least one sample has at most
//! [`EXACT_MAX_SAMPLE`] observations, otherwise the normal approximation with
//! tie correction and a 0.5 continuity correction.

use crate::error::{DeError, Result};
use crate::testing::{Alternative, PValueMethod, TestResult};
use ndarray::ArrayView2;
use single_utilities::traits::FloatOps;
use statrs::function::erf::erfc;
use std::cmp::Ordering;
use std::f64::consts::SQRT_2;

/// Largest sample size for which the exact distribution is used.
pub const EXACT_MAX_SAMPLE: usize = 8;

/// Run the test for every feature row of `matrix` (features × samples),
/// comparing the sample columns in `group1_indices` against `group2_indices`.
pub fn mann_whitney_matrix_groups<T>(
    matrix: ArrayView2<'_, T>,
    group1_indices: &[usize],
    group2_indices: &[usize],
    alternative: Alternative,
) -> Result<Vec<TestResult<T>>>
where
    T: FloatOps,
{
    if group1_indices.is_empty() || group2_indices.is_empty() {
        return Err(DeError::InvalidParameter(
            "Group indices cannot be empty".to_string(),
        ));
    }
    let ncols = matrix.ncols();
    if let Some(&col) = group1_indices
        .iter()
        .chain(group2_indices)
        .find(|&&c| c >= ncols)
    {
        return Err(DeError::InvalidParameter(format!(
            "Sample index {} out of bounds for {} samples",
            col, ncols
        )));
    }

    // Group sizes are fixed across rows, so the exact null distribution is shared.
    let (nx, ny) = (group1_indices.len(), group2_indices.len());
    let exact_null =
        (nx <= EXACT_MAX_SAMPLE || ny <= EXACT_MAX_SAMPLE).then(|| ExactU::new(nx, ny));

    let results = matrix
        .rows()
        .into_iter()
        .map(|row| {
            let group1_values: Vec<T> = group1_indices.iter().map(|&c| row[c]).collect();
            let group2_values: Vec<T> = group2_indices.iter().map(|&c| row[c]).collect();
            rank_sum_test(&group1_values, &group2_values, alternative, exact_null.as_ref())
        })
        .collect();

    Ok(results)
}

pub fn mann_whitney<T>(x: &[T], y: &[T], alternative: Alternative) -> TestResult<T>
where
    T: FloatOps,
{
    rank_sum_test(x, y, alternative, None)
}

/// `exact_null`, when given, must be the distribution for `(x.len(), y.len())`.
fn rank_sum_test<T>(
    x: &[T],
    y: &[T],
    alternative: Alternative,
    exact_null: Option<&ExactU>,
) -> TestResult<T>
where
    T: FloatOps,
{
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        return TestResult::degenerate(<T as num_traits::Float>::nan()); // Insufficient data
    }
    if x.iter().chain(y).any(|&v| num_traits::Float::is_nan(v)) {
        return TestResult::degenerate(<T as num_traits::Float>::nan());
    }

    // Combine samples and assign group labels (0 for x, 1 for y)
    let mut combined: Vec<(T, usize)> = Vec::with_capacity(nx + ny);
    combined.extend(x.iter().map(|&v| (v, 0)));
    combined.extend(y.iter().map(|&v| (v, 1)));

    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // Average ranks over ties, accumulating sum(t^3 - t) for the variance correction
    let mut rank_sum_x = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < combined.len() {
        let val = combined[i].0;
        let mut j = i + 1;
        while j < combined.len() && combined[j].0 == val {
            j += 1;
        }

        let rank = (i + j - 1) as f64 / 2.0 + 1.0;
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        for entry in &combined[i..j] {
            if entry.1 == 0 {
                rank_sum_x += rank;
            }
        }

        i = j;
    }
    let has_ties = tie_term > 0.0;

    let nxf = nx as f64;
    let nyf = ny as f64;
    let n = nxf + nyf;
    let u_x = rank_sum_x - nxf * (nxf + 1.0) / 2.0;
    let u_y = nxf * nyf - u_x;

    let mean_u = nxf * nyf / 2.0;
    let var_u = nxf * nyf / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    let auc = u_x / (nxf * nyf);

    let exact = !has_ties && (nx <= EXACT_MAX_SAMPLE || ny <= EXACT_MAX_SAMPLE);

    let result = if exact {
        let built;
        let dist = match exact_null {
            Some(dist) => dist,
            None => {
                built = ExactU::new(nx, ny);
                &built
            }
        };
        // Without ties both U values are integers.
        let ux = u_x.round() as usize;
        let uy = u_y.round() as usize;
        let p_value = match alternative {
            Alternative::TwoSided => 2.0 * dist.cdf(ux.min(uy)),
            Alternative::Greater => dist.sf(ux),
            Alternative::Less => dist.sf(uy),
        };
        TestResult::new(cast(u_x), cast(p_value.clamp(0.0, 1.0)), PValueMethod::Exact)
    } else {
        if var_u.is_nan() || var_u <= 0.0 {
            return TestResult::degenerate(cast(u_x));
        }
        let sd_u = var_u.sqrt();
        let u = match alternative {
            Alternative::TwoSided => u_x.max(u_y),
            Alternative::Greater => u_x,
            Alternative::Less => u_y,
        };
        let z = (u - mean_u - 0.5) / sd_u;
        let upper_tail = normal_sf(z);
        let p_value = match alternative {
            Alternative::TwoSided => 2.0 * upper_tail,
            _ => upper_tail,
        };
        TestResult::new(
            cast(u_x),
            cast(p_value.clamp(0.0, 1.0)),
            PValueMethod::Asymptotic,
        )
        .with_metadata("z_score", cast(z))
    };

    result
        .with_effect_size(cast(auc))
        .with_standard_error(cast(var_u.max(0.0).sqrt()))
        .with_metadata("mean_u", cast(mean_u))
        .with_metadata("var_u", cast(var_u))
        .with_metadata("nx", cast(nxf))
        .with_metadata("ny", cast(nyf))
}

/// Upper tail of the standard normal distribution.
fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

fn cast<T>(value: f64) -> T
where
    T: FloatOps,
{
    T::from(value).unwrap_or_else(<T as num_traits::Float>::nan)
}

/// Exact null distribution of U for sample sizes `nx`, `ny` without ties.
///
/// The frequencies of U are the coefficients of the Gaussian binomial
/// `[nx + ny choose nx]_q`, built up one factor `(1 - q^(n+i)) / (1 - q^i)` at a
/// time. Each intermediate product is itself a polynomial.
struct ExactU {
    frequencies: Vec<f64>,
    total: f64,
}

impl ExactU {
    fn new(nx: usize, ny: usize) -> Self {
        let (m, n) = if nx <= ny { (nx, ny) } else { (ny, nx) };
        let max_u = m * n;
        let mut frequencies = vec![0.0; max_u + 1];
        frequencies[0] = 1.0;

        for i in 1..=m {
            let shift = n + i;
            for k in (shift..=max_u).rev() {
                frequencies[k] -= frequencies[k - shift];
            }
            for k in i..=max_u {
                frequencies[k] += frequencies[k - i];
            }
        }

        let total = frequencies.iter().sum();
        ExactU { frequencies, total }
    }

    /// P(U <= u)
    fn cdf(&self, u: usize) -> f64 {
        let upto = u.min(self.frequencies.len() - 1);
        self.frequencies[..=upto].iter().sum::<f64>() / self.total
    }

    /// P(U >= u)
    fn sf(&self, u: usize) -> f64 {
        if u >= self.frequencies.len() {
            return 0.0;
        }
        self.frequencies[u..].iter().sum::<f64>() / self.total
    }
}
