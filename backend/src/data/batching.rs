//! Works around the store's membership-filter limit by querying id lists in
//! groups of at most [`BATCH_SIZE`].

use crate::store::{self, DocumentStore, Record, StoreError, MAX_IN_VALUES};

pub const BATCH_SIZE: usize = MAX_IN_VALUES;

/// Calls `fetch` once per group of at most `BATCH_SIZE` ids and concatenates
/// the results in group order.
///
/// An empty list issues no call. Ids are not deduplicated, and the first
/// failing group aborts the whole fetch.
pub fn fetch_in_batches<T, E, F>(ids: &[String], mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(&[String]) -> Result<Vec<T>, E>,
{
    let mut results = Vec::new();
    for chunk in ids.chunks(BATCH_SIZE) {
        results.extend(fetch(chunk)?);
    }
    Ok(results)
}

/// Loads every `T` whose `field` is one of `ids`.
pub fn records_where_in<T: Record>(
    store: &dyn DocumentStore,
    field: &'static str,
    ids: &[String],
) -> Result<Vec<T>, StoreError> {
    fetch_in_batches(ids, |chunk| {
        let query = store::select::<T>().one_of(field, chunk.iter().cloned());
        store::fetch_where::<T>(store, &query)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("id-{:02}", i)).collect()
    }

    fn run(n: usize) -> (Vec<String>, Vec<usize>) {
        let mut calls = Vec::new();
        let out: Result<Vec<String>, ()> = fetch_in_batches(&ids(n), |chunk| {
            calls.push(chunk.len());
            Ok(chunk.iter().map(|id| format!("doc:{}", id)).collect())
        });
        (out.expect("no failures"), calls)
    }

    #[test]
    fn empty_input_issues_no_queries() {
        let (out, calls) = run(0);
        assert!(out.is_empty());
        assert!(calls.is_empty());
    }

    #[test]
    fn partitions_into_groups_of_ten() {
        assert_eq!(run(10).1, vec![10]);
        assert_eq!(run(11).1, vec![10, 1]);
        assert_eq!(run(25).1, vec![10, 10, 5]);
    }

    #[test]
    fn concatenates_in_partition_order() {
        let (out, _) = run(25);
        let expected: Vec<String> = ids(25).iter().map(|id| format!("doc:{}", id)).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn keeps_each_partitions_own_order() {
        let out: Result<Vec<String>, ()> = fetch_in_batches(&ids(12), |chunk| {
            Ok(chunk.iter().rev().cloned().collect())
        });
        let out = out.expect("no failures");
        assert_eq!(out[0], "id-09");
        assert_eq!(out[9], "id-00");
        assert_eq!(out[10], "id-11");
        assert_eq!(out[11], "id-10");
    }

    #[test]
    fn first_failure_propagates() {
        let mut calls = 0;
        let out: Result<Vec<String>, String> = fetch_in_batches(&ids(30), |chunk| {
            calls += 1;
            if chunk[0] == "id-10" {
                Err("store unavailable".to_string())
            } else {
                Ok(chunk.to_vec())
            }
        });
        assert_eq!(out.unwrap_err(), "store unavailable");
        assert_eq!(calls, 2);
    }
}
