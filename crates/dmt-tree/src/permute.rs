//! # Index Permutations
//!
//! Lazy, restartable enumeration of every ordering of `0..n`, in
//! lexicographic order. The subtree matcher pairs `candidate_children[i]`
//! with `pattern_children[perm[i]]` for each yielded permutation; it never
//! shuffles nodes itself.
//!
//! Uses the classic next-permutation step: find the rightmost ascent
//! `a[k] < a[k + 1]`, swap `a[k]` with the rightmost element greater than it,
//! then reverse the suffix after `k`. No ascent means the last permutation
//! was produced.

/// Iterator over all permutations of `0..n`.
///
/// Yields exactly `n!` items; for `n == 0` it yields the single empty
/// permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPermutations {
    n: usize,
    next: Option<Vec<usize>>,
}

impl IndexPermutations {
    /// Start enumerating the permutations of `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            next: Some((0..n).collect()),
        }
    }

    /// Restart from the identity permutation.
    pub fn reset(&mut self) {
        self.next = Some((0..self.n).collect());
    }

    /// Number of items in a full enumeration (`n!`), saturating at `usize::MAX`.
    pub fn len_hint(&self) -> usize {
        (1..=self.n).fold(1usize, |acc, k| acc.saturating_mul(k))
    }
}

fn advance(perm: &[usize]) -> Option<Vec<usize>> {
    let k = perm.windows(2).rposition(|w| w[0] < w[1])?;
    let mut next = perm.to_vec();
    let l = (k + 1..next.len()).rev().find(|&l| next[k] < next[l])?;
    next.swap(k, l);
    next[k + 1..].reverse();
    Some(next)
}

impl Iterator for IndexPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        self.next = advance(&current);
        Some(current)
    }
}
