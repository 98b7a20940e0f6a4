pub(crate) fn partial_cmp_equal(a: &f64, b: &f64) -> bool {
    matches!(a.partial_cmp(b), Some(std::cmp::Ordering::Equal))
}
