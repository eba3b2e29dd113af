//! Component-wise vector helpers shared by the detectors.

/// True if `req[j] <= work[j]` for every component.
pub(crate) fn vec_le(req: &[u32], work: &[u32]) -> bool {
    req.iter().zip(work).all(|(r, w)| r <= w)
}

/// Component-wise sum, into a fresh vector.
pub(crate) fn vec_add(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Display form used throughout traces: `[3, 0, 2]`.
pub(crate) fn fmt_vec(v: &[u32]) -> String {
    let cells: Vec<String> = v.iter().map(u32::to_string).collect();
    format!("[{}]", cells.join(", "))
}
