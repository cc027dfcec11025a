use std::cmp::Eq;
use std::fmt::Debug;

use derive_more::Display;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use ordered_float::FloatCore;
use ordered_float::OrderedFloat;

use crate::cost::Cost;

/// A totally ordered floating point cost.
///
/// Infinity is the largest cost and stands for "no edge".
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost<F: FloatCore>(pub OrderedFloat<F>);

/// The cost used by route documents.
pub type RouteCost = FloatCost<f64>;

impl<F> Cost for FloatCost<F>
where
    FloatCost<F>: Debug + Ord + Eq + UpperBounded,
    F: FloatCore + std::fmt::Display,
{
}

impl<F> FloatCost<F>
where
    F: FloatCore,
{
    pub fn new(f: F) -> Self {
        Self(OrderedFloat(f))
    }
    pub fn from_ordered_float(f: OrderedFloat<F>) -> Self {
        Self(f)
    }

    /// The raw float.
    #[inline(always)]
    pub fn get(&self) -> F {
        self.0.into_inner()
    }

    #[inline(always)]
    pub fn infinity() -> Self {
        Self(OrderedFloat::infinity())
    }

    /// Whether this can be used as an edge cost: zero or more, possibly
    /// infinite, never NaN.
    ///
    /// ```
    /// use route_search::float_cost::FloatCost;
    /// assert!(FloatCost::new(0.0f64).is_edge_cost());
    /// assert!(FloatCost::new(3.5f64).is_edge_cost());
    /// assert!(FloatCost::<f64>::infinity().is_edge_cost());
    /// assert!(!FloatCost::new(-1.0f64).is_edge_cost());
    /// assert!(!FloatCost::new(f64::NAN).is_edge_cost());
    /// ```
    pub fn is_edge_cost(&self) -> bool {
        let f = self.get();
        !f.is_nan() && f >= F::zero()
    }
}

impl From<f64> for FloatCost<f64> {
    fn from(f: f64) -> Self {
        Self::new(f)
    }
}

impl<F> std::ops::Add for FloatCost<F>
where
    OrderedFloat<F>: std::ops::Add<OrderedFloat<F>, Output = OrderedFloat<F>>,
    F: FloatCore,
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<F> Zero for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0 == OrderedFloat::zero()
    }
    #[inline(always)]
    fn zero() -> Self {
        Self(OrderedFloat::zero())
    }
}
impl<F> UpperBounded for FloatCost<F>
where
    F: FloatCore,
{
    fn max_value() -> Self {
        Self(OrderedFloat::<F>::infinity())
    }
}

impl<F> PartialOrd for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.0))
    }
}
impl<F> Ord for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}
impl<F> PartialEq for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<F> Eq for FloatCost<F> where F: FloatCore {}
