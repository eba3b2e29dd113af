//! Lexicographic k-combination enumeration.
//!
//! The advisor needs combinations of the sorted deadlocked id list in
//! a fixed order so that its output is reproducible run to run.

/// All k-element combinations of `items`, in lexicographic order of
/// positions. Empty when `k == 0` or `k > items.len()`.
pub(crate) fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();

    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());

        // Advance the rightmost index that still has room, then reset
        // everything to its right.
        let mut pos = k;
        while pos > 0 {
            pos -= 1;
            if idx[pos] != pos + n - k {
                idx[pos] += 1;
                for later in pos + 1..k {
                    idx[later] = idx[later - 1] + 1;
                }
                break;
            }
            if pos == 0 {
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_in_lexicographic_order() {
        assert_eq!(
            combinations(&[1, 2, 3, 4], 2),
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4],
            ]
        );
    }

    #[test]
    fn test_full_and_single_sizes() {
        assert_eq!(combinations(&[7, 8], 2), vec![vec![7, 8]]);
        assert_eq!(combinations(&[7, 8], 1), vec![vec![7], vec![8]]);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(combinations(&[1, 2], 0).is_empty());
        assert!(combinations(&[1, 2], 3).is_empty());
        assert!(combinations::<u32>(&[], 1).is_empty());
    }

    #[test]
    fn test_count_matches_binomial() {
        // C(6, 3) = 20
        assert_eq!(combinations(&[0, 1, 2, 3, 4, 5], 3).len(), 20);
    }
}
