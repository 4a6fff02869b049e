//! Rank/degree type shared by the Fibonacci heap, the soft heap and the
//! disjoint-set forest.
//!
//! Ranks grow logarithmically in the number of elements, so `u8` is plenty:
//! even a forest of 2⁶⁴ elements stays far below 255. Keeping the field one
//! byte wide lets it pack next to the mark bit in arena cells.

/// Node rank / degree.
pub type Rank = u8;

/// Largest representable rank.
pub const MAX_RANK: Rank = u8::MAX;

/// Increment a rank, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`, which would require more elements than fit
/// in memory and therefore indicates a corrupted structure.
///
/// ```rust
/// use graph_heaps::rank::checked_increment;
///
/// assert_eq!(checked_increment(5), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1)
        .expect("rank overflow: ranks are logarithmic in the element count")
}

/// Decrement a rank, stopping at zero.
#[inline]
pub fn saturating_decrement(rank: Rank) -> Rank {
    rank.saturating_sub(1)
}

/// Upper bound on the degree of any root in a Fibonacci heap of `len` cells.
///
/// A root of degree `d` roots a subtree of at least `F(d + 2) ≥ φ^d` cells,
/// so `d ≤ log_φ(len)`. Used to size the consolidation table.
pub fn max_degree(len: usize) -> usize {
    const LOG2_PHI: f64 = 0.694_241_913_630_617_3;
    if len < 2 {
        return 1;
    }
    ((len as f64).log2() / LOG2_PHI) as usize + 2
}
