use ndarray::Array2;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

/// Cosine tables keyed by transform length, built once per length
static COSINES: Lazy<Mutex<HashMap<usize, Arc<[f64]>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Table of `cos(π/n · (i + 0.5) · k)` laid out as `table[i + k * n]`
pub(crate) fn cosine_table(n: usize) -> Arc<[f64]> {
    // A poisoned lock only means another thread panicked mid-insert; the map
    // itself still holds complete tables.
    let mut cache = COSINES.lock().unwrap_or_else(|e| e.into_inner());
    cache
        .entry(n)
        .or_insert_with(|| {
            let pi_n = PI / n as f64;
            let mut table = vec![0.0; n * n];
            for k in 0..n {
                for i in 0..n {
                    table[i + k * n] = (pi_n * (i as f64 + 0.5) * k as f64).cos();
                }
            }
            table.into()
        })
        .clone()
}

/// Unnormalised type-II DCT: `y[k] = scale · Σ x[i] · cos(π/n · (i + 0.5) · k)`
pub(crate) fn dct(signal: &[f64], scale: f64) -> Vec<f64> {
    let n = signal.len();
    let cos = cosine_table(n);

    (0..n)
        .map(|k| {
            let row = &cos[k * n..(k + 1) * n];
            scale * signal.iter().zip(row).fold(0.0, |acc, (x, c)| acc + x * c)
        })
        .collect()
}

/// 2D DCT-II: transform every column, then every row of the result
pub(crate) fn dct_2d(matrix: &Array2<f64>) -> Array2<f64> {
    let mut out = matrix.clone();

    for mut column in out.columns_mut() {
        let signal: Vec<f64> = column.iter().copied().collect();
        for (dst, v) in column.iter_mut().zip(dct(&signal, 2.0)) {
            *dst = v;
        }
    }

    for mut row in out.rows_mut() {
        let signal: Vec<f64> = row.iter().copied().collect();
        for (dst, v) in row.iter_mut().zip(dct(&signal, 2.0)) {
            *dst = v;
        }
    }

    out
}
