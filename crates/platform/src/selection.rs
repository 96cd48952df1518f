//! Selection preconditions over record slices.
//!
//! Operations that only make sense on a single record take the whole
//! selection and assert its size explicitly, so misuse surfaces as a
//! `Precondition` error instead of silently acting on the first record.

use tallyworks_core::{DomainError, DomainResult};

/// The sole record of `records`, or a `Precondition` error for 0 or 2+.
pub fn ensure_one<'a, T>(records: &'a [T], model: &str) -> DomainResult<&'a T> {
    match records {
        [record] => Ok(record),
        _ => Err(precondition(records.len(), model)),
    }
}

/// Mutable variant of [`ensure_one`].
pub fn ensure_one_mut<'a, T>(records: &'a mut [T], model: &str) -> DomainResult<&'a mut T> {
    let len = records.len();
    match records {
        [record] => Ok(record),
        _ => Err(precondition(len, model)),
    }
}

fn precondition(len: usize, model: &str) -> DomainError {
    DomainError::precondition(format!(
        "expected a single {model} record, got {len}"
    ))
}
