/// What the search needs from an edge or path cost.
///
/// The upper bound doubles as the "unreachable" value: it marks missing edges
/// in a [`crate::graph::Graph`] and seeds the best-known-cost table.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::Zero
    + num_traits::bounds::UpperBounded
    + std::ops::Add<Self, Output = Self>
{
    /// Whether this is a usable cost rather than the unreachable marker.
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != num_traits::bounds::UpperBounded::max_value()
    }
}
