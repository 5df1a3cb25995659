use indexmap::IndexSet;

/// Remove duplicates from a list of ids, keeping the first occurrence of each.
///
/// Pairs well with [`Params::get_u64_list`](crate::Params::get_u64_list).
///
/// ```rust
/// use pavex_params::unique_u64;
///
/// assert_eq!(unique_u64(&[3, 2, 1, 3, 3]), vec![3, 2, 1]);
/// ```
pub fn unique_u64(ids: &[u64]) -> Vec<u64> {
    ids.iter().copied().collect::<IndexSet<u64>>().into_iter().collect()
}
