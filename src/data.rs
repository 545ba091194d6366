//! Synthetic benchmark table and round-trip checks.
//!
//! The table is a `rows x columns` matrix of uniform `f64` values in
//! `[0, 1)` named `c1..cN`. Values are drawn row by row from a seeded
//! `StdRng`, so a given `(rows, columns, seed)` always produces the same
//! bits.

use crate::errors::{BenchError, BenchResult};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn column_names(columns: usize) -> Vec<String> {
    (1..=columns).map(|i| format!("c{}", i)).collect()
}

pub fn generate_frame(rows: usize, columns: usize, seed: u64) -> BenchResult<DataFrame> {
    if rows == 0 || columns == 0 {
        return Err(BenchError::InvalidConfig(format!(
            "cannot generate a {}x{} table",
            rows, columns
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<Vec<f64>> = (0..columns).map(|_| Vec::with_capacity(rows)).collect();
    for _ in 0..rows {
        for column in values.iter_mut() {
            column.push(rng.gen::<f64>());
        }
    }

    let series: Vec<Column> = column_names(columns)
        .into_iter()
        .zip(values)
        .map(|(name, data)| Column::new(name.into(), data))
        .collect();

    DataFrame::new(series).map_err(BenchError::PolarsError)
}

/// Check that `decoded` holds the same table as `expected`.
///
/// Without a tolerance every value must match exactly; otherwise each
/// absolute difference must stay within it.
pub fn verify_round_trip(
    expected: &DataFrame,
    decoded: &DataFrame,
    tolerance: Option<f64>,
) -> BenchResult<()> {
    if expected.shape() != decoded.shape() {
        return Err(BenchError::VerificationError(format!(
            "shape {:?} does not match expected {:?}",
            decoded.shape(),
            expected.shape()
        )));
    }

    for (want, got) in expected.get_columns().iter().zip(decoded.get_columns()) {
        if want.name() != got.name() {
            return Err(BenchError::VerificationError(format!(
                "column '{}' decoded as '{}'",
                want.name(),
                got.name()
            )));
        }
        if want.dtype() != got.dtype() {
            return Err(BenchError::VerificationError(format!(
                "column '{}' has dtype {}, expected {}",
                want.name(),
                got.dtype(),
                want.dtype()
            )));
        }

        let matches = match tolerance {
            None => want.as_materialized_series().equals(got.as_materialized_series()),
            Some(tol) => within_tolerance(want, got, tol)?,
        };
        if !matches {
            return Err(BenchError::VerificationError(format!(
                "values of column '{}' differ",
                want.name()
            )));
        }
    }
    Ok(())
}

fn within_tolerance(want: &Column, got: &Column, tol: f64) -> BenchResult<bool> {
    let want = want.f64().map_err(BenchError::PolarsError)?;
    let got = got.f64().map_err(BenchError::PolarsError)?;
    Ok(want
        .iter()
        .zip(got.iter())
        .all(|pair| match pair {
            (Some(a), Some(b)) => (a - b).abs() <= tol,
            (None, None) => true,
            _ => false,
        }))
}
