//! Longest-common-subsequence alignment of two item sequences.
//!
//! Used to line up the items of a translated resource with the items of the same resource in
//! the reference language. Resources are small (a few hundred items at most), so the simple
//! O(n·m) time and space table is fine.

use serde::Serialize;

/// One step of an edit script.
///
/// The discriminants are the 2-bit flags used by the renderers: bit 0 means "the row has a
/// left item", bit 1 means "the row has a right item".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DiffOp {
    /// Only the left sequence has an item on this row (a deletion relative to the right).
    LeftOnly = 1,
    /// Only the right sequence has an item on this row (an insertion relative to the left).
    RightOnly = 2,
    /// Both sequences have an item and the two are aligned.
    MatchBoth = 3,
}

impl DiffOp {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn has_left(self) -> bool {
        self.bits() & 1 != 0
    }

    pub fn has_right(self) -> bool {
        self.bits() & 2 != 0
    }

    /// The same step seen from the other side.
    pub fn mirrored(self) -> DiffOp {
        match self {
            DiffOp::LeftOnly => DiffOp::RightOnly,
            DiffOp::RightOnly => DiffOp::LeftOnly,
            DiffOp::MatchBoth => DiffOp::MatchBoth,
        }
    }
}

/// Compute the edit script aligning `left` with `right`.
///
/// The common prefix and suffix (as decided by `equals`) are matched pairwise first; the LCS
/// table is only built for what remains in the middle. While backtracking, a mismatch moves
/// towards the neighbour with the larger table value, taking the left item on ties.
pub fn diff_sequences<A, B, F>(left: &[A], right: &[B], equals: F) -> Vec<DiffOp>
where
    F: Fn(&A, &B) -> bool,
{
    let n = left.len();
    let m = right.len();
    let eq = |i: usize, j: usize| equals(&left[i], &right[j]);

    let min_count = n.min(m);
    let mut start = 0;
    while start < min_count && eq(start, start) {
        start += 1;
    }

    if start == min_count && n == m {
        return vec![DiffOp::MatchBoth; n];
    }

    let mut end = 0;
    while end < min_count - start && eq(n - 1 - end, m - 1 - end) {
        end += 1;
    }

    let rows = n - start - end;
    let cols = m - start - end;

    let mut table = vec![vec![0usize; cols + 1]; rows + 1];
    for i in 1..=rows {
        for j in 1..=cols {
            table[i][j] = if eq(start + i - 1, start + j - 1) {
                table[i - 1][j - 1] + 1
            } else if table[i][j - 1] > table[i - 1][j] {
                table[i][j - 1]
            } else {
                table[i - 1][j]
            };
        }
    }

    // Backtracking produces the script in reverse order.
    let mut out = Vec::with_capacity(rows + cols + start + end);
    out.extend(std::iter::repeat_n(DiffOp::MatchBoth, end));

    let (mut i, mut j) = (rows, cols);
    while i > 0 || j > 0 {
        let step = if i == 0 {
            DiffOp::RightOnly
        } else if j == 0 {
            DiffOp::LeftOnly
        } else if eq(start + i - 1, start + j - 1) {
            DiffOp::MatchBoth
        } else if table[i][j - 1] > table[i - 1][j] {
            DiffOp::RightOnly
        } else {
            DiffOp::LeftOnly
        };

        out.push(step);

        if step.has_left() {
            i -= 1;
        }
        if step.has_right() {
            j -= 1;
        }
    }

    out.extend(std::iter::repeat_n(DiffOp::MatchBoth, start));
    out.reverse();
    out
}

/// Turn an edit script into per-row `(left index, right index)` pairs.
pub fn aligned_indices(ops: &[DiffOp]) -> Vec<(Option<usize>, Option<usize>)> {
    let mut left = 0;
    let mut right = 0;
    ops.iter()
        .map(|op| {
            let l = op.has_left().then(|| {
                left += 1;
                left - 1
            });
            let r = op.has_right().then(|| {
                right += 1;
                right - 1
            });
            (l, r)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use DiffOp::*;

    fn count(ops: &[DiffOp], op: DiffOp) -> usize {
        ops.iter().filter(|&&o| o == op).count()
    }

    #[test]
    fn test_identical_sequences_are_fully_aligned() {
        let a = [1, 2, 3, 4];
        assert_eq!(diff_sequences(&a, &a, |x, y| x == y), vec![MatchBoth; 4]);
        let empty: [u8; 0] = [];
        assert_eq!(diff_sequences(&empty, &empty, |x, y| x == y), vec![]);
    }

    #[test]
    fn test_insertion_in_the_middle() {
        let a = ['a', 'b', 'd'];
        let b = ['a', 'b', 'c', 'd'];
        assert_eq!(
            diff_sequences(&a, &b, |x, y| x == y),
            vec![MatchBoth, MatchBoth, RightOnly, MatchBoth]
        );
    }

    #[test]
    fn test_appended_and_removed_items() {
        let a = [1, 2];
        let b = [1, 2, 3];
        assert_eq!(
            diff_sequences(&a, &b, |x, y| x == y),
            vec![MatchBoth, MatchBoth, RightOnly]
        );
        assert_eq!(
            diff_sequences(&b, &a, |x, y| x == y),
            vec![MatchBoth, MatchBoth, LeftOnly]
        );
        let empty: [i32; 0] = [];
        assert_eq!(diff_sequences(&a, &empty, |x, y| x == y), vec![LeftOnly; 2]);
        assert_eq!(diff_sequences(&empty, &a, |x, y| x == y), vec![RightOnly; 2]);
    }

    #[test]
    fn test_replacement_takes_right_first_then_left() {
        // Ties while backtracking take the left item, which ends up last after reversal.
        let a = ['x'];
        let b = ['y'];
        assert_eq!(diff_sequences(&a, &b, |x, y| x == y), vec![RightOnly, LeftOnly]);
    }

    #[test]
    fn test_swapping_sides_mirrors_the_counts() {
        let inputs: [(&[u8], &[u8]); 4] = [
            (b"abcbdab", b"bdcaba"),
            (b"kitten", b"sitting"),
            (b"", b"abc"),
            (b"same", b"same"),
        ];
        for (a, b) in inputs {
            let forward = diff_sequences(a, b, |x, y| x == y);
            let backward = diff_sequences(b, a, |x, y| x == y);
            assert_eq!(forward.len(), backward.len());
            assert_eq!(count(&forward, MatchBoth), count(&backward, MatchBoth));
            assert_eq!(count(&forward, LeftOnly), count(&backward, RightOnly));
            assert_eq!(count(&forward, RightOnly), count(&backward, LeftOnly));
            assert_eq!(count(&forward, LeftOnly) + count(&forward, MatchBoth), a.len());
            assert_eq!(count(&forward, RightOnly) + count(&forward, MatchBoth), b.len());
        }
    }

    #[test]
    fn test_unambiguous_scripts_mirror_exactly() {
        let a = [1, 2, 3, 5];
        let b = [1, 3, 4, 5];
        let forward = diff_sequences(&a, &b, |x, y| x == y);
        let backward = diff_sequences(&b, &a, |x, y| x == y);
        assert_eq!(forward, vec![MatchBoth, LeftOnly, MatchBoth, RightOnly, MatchBoth]);
        assert_eq!(
            backward,
            forward.iter().map(|op| op.mirrored()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lcs_length_is_maximal() {
        let a = b"abcbdab";
        let b = b"bdcaba";
        let ops = diff_sequences(a, b, |x, y| x == y);
        assert_eq!(count(&ops, MatchBoth), 4);
    }

    #[test]
    fn test_aligned_indices() {
        let ops = [MatchBoth, LeftOnly, RightOnly, MatchBoth];
        assert_eq!(
            aligned_indices(&ops),
            vec![
                (Some(0), Some(0)),
                (Some(1), None),
                (None, Some(1)),
                (Some(2), Some(2)),
            ]
        );
    }
}
