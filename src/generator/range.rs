/// Resolve a `(min, max)` pair against defaults.
///
/// Unset bounds take the default; a max below the min is raised to the min.
pub fn normalize_range(
    min: Option<usize>,
    max: Option<usize>,
    default: (usize, usize),
) -> (usize, usize) {
    let min = min.unwrap_or(default.0);
    let max = max.unwrap_or(default.1);
    (min, max.max(min))
}
