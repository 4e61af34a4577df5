//! Flat per-vertex sensitivity vector.

use crate::GlobalIndex;
use nalgebra::Vector3;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Derivatives of every tessellation vertex with respect to one design
/// parameter entry.
///
/// Stored as `3 × N_global` reals laid out as consecutive `(dx, dy, dz)`
/// triples, the triple for global point `g` starting at `3 × (g − 1)`.
/// A fresh vector is all zeros; points that are never written keep a zero
/// derivative.
///
/// # Example
///
/// ```
/// use sens_types::{GlobalIndex, SensitivityVector, Vector3};
///
/// let mut dsen = SensitivityVector::zeros(2);
/// let g2 = GlobalIndex::new(2).unwrap();
/// dsen.set(g2, Vector3::new(1.0, 2.0, 3.0));
///
/// assert_eq!(dsen.point_count(), 2);
/// assert_eq!(dsen.get(g2), Some(Vector3::new(1.0, 2.0, 3.0)));
/// assert_eq!(dsen.into_vec(), vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct SensitivityVector {
    data: Vec<f64>,
}

impl SensitivityVector {
    /// Allocate a zeroed vector for `point_count` global points.
    #[must_use]
    pub fn zeros(point_count: usize) -> Self {
        Self {
            data: vec![0.0; 3 * point_count],
        }
    }

    /// Wrap an existing flat `xyz` array.
    ///
    /// Returns `None` when the length is not a multiple of 3.
    #[must_use]
    pub fn from_flat(data: Vec<f64>) -> Option<Self> {
        (data.len() % 3 == 0).then_some(Self { data })
    }

    /// Number of reals (`3 × point_count`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector holds no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of global points covered.
    #[inline]
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.data.len() / 3
    }

    /// Whether `g` addresses a point inside this vector.
    #[inline]
    #[must_use]
    pub fn contains(&self, g: GlobalIndex) -> bool {
        g.offset() + 3 <= self.data.len()
    }

    /// Derivative of point `g`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, g: GlobalIndex) -> Option<Vector3<f64>> {
        let o = g.offset();
        self.data
            .get(o..o + 3)
            .map(|d| Vector3::new(d[0], d[1], d[2]))
    }

    /// Overwrite the derivative of point `g`.
    ///
    /// Returns `false` and leaves the vector untouched when `g` is out of
    /// range.
    pub fn set(&mut self, g: GlobalIndex, value: Vector3<f64>) -> bool {
        let o = g.offset();
        match self.data.get_mut(o..o + 3) {
            Some(slot) => {
                slot.copy_from_slice(value.as_slice());
                true
            }
            None => false,
        }
    }

    /// Add to the derivative of point `g`.
    ///
    /// Returns `false` and leaves the vector untouched when `g` is out of
    /// range.
    pub fn accumulate(&mut self, g: GlobalIndex, value: Vector3<f64>) -> bool {
        let o = g.offset();
        match self.data.get_mut(o..o + 3) {
            Some(slot) => {
                for (s, v) in slot.iter_mut().zip(value.iter()) {
                    *s += v;
                }
                true
            }
            None => false,
        }
    }

    /// Scale the derivative of point `g` in place.
    pub fn scale_point(&mut self, g: GlobalIndex, factor: f64) {
        let o = g.offset();
        if let Some(slot) = self.data.get_mut(o..o + 3) {
            for s in slot {
                *s *= factor;
            }
        }
    }

    /// Iterate over per-point derivatives in global index order.
    pub fn points(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.data
            .chunks_exact(3)
            .map(|d| Vector3::new(d[0], d[1], d[2]))
    }

    /// Largest derivative magnitude over all points.
    #[must_use]
    pub fn max_norm(&self) -> f64 {
        self.points().map(|v| v.norm()).fold(0.0, f64::max)
    }

    /// Flat view of the data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into the flat data.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl From<SensitivityVector> for Vec<f64> {
    fn from(v: SensitivityVector) -> Self {
        v.data
    }
}

impl TryFrom<Vec<f64>> for SensitivityVector {
    type Error = FlatLengthError;

    fn try_from(data: Vec<f64>) -> Result<Self, Self::Error> {
        let len = data.len();
        Self::from_flat(data).ok_or(FlatLengthError { len })
    }
}

/// A flat array whose length is not a multiple of 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatLengthError {
    /// Length of the rejected array.
    pub len: usize,
}

impl fmt::Display for FlatLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flat array of {} reals is not made of xyz triples", self.len)
    }
}

impl std::error::Error for FlatLengthError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn g(i: u32) -> GlobalIndex {
        GlobalIndex::new(i).unwrap()
    }

    #[test]
    fn test_zeros_has_three_reals_per_point() {
        let v = SensitivityVector::zeros(5);
        assert_eq!(v.len(), 15);
        assert_eq!(v.point_count(), 5);
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_set_out_of_range_is_rejected() {
        let mut v = SensitivityVector::zeros(2);
        assert!(!v.set(g(3), Vector3::new(1.0, 1.0, 1.0)));
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
        assert!(v.get(g(3)).is_none());
        assert!(!v.contains(g(3)));
        assert!(v.contains(g(2)));
    }

    #[test]
    fn test_set_overwrites() {
        let mut v = SensitivityVector::zeros(1);
        v.set(g(1), Vector3::new(1.0, 0.0, 0.0));
        v.set(g(1), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(v.get(g(1)), Some(Vector3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_accumulate_and_scale() {
        let mut v = SensitivityVector::zeros(1);
        v.accumulate(g(1), Vector3::new(1.0, 2.0, 3.0));
        v.accumulate(g(1), Vector3::new(3.0, 2.0, 1.0));
        v.scale_point(g(1), 0.5);
        let p = v.get(g(1)).unwrap();
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 2.0);
    }

    #[test]
    fn test_from_flat_requires_triples() {
        assert!(SensitivityVector::from_flat(vec![0.0; 4]).is_none());
        let v = SensitivityVector::from_flat(vec![0.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(v.max_norm(), 5.0);
    }

    #[test]
    fn test_try_from_rejects_partial_points() {
        let err = SensitivityVector::try_from(vec![1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert_eq!(err, FlatLengthError { len: 4 });
        assert!(err.to_string().contains('4'));
        assert_eq!(SensitivityVector::try_from(vec![0.0; 6]).unwrap().point_count(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_whole_points() {
        let mut v = SensitivityVector::zeros(2);
        v.set(g(2), Vector3::new(1.0, 2.0, 3.0));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0.0,0.0,0.0,1.0,2.0,3.0]");
        let back: SensitivityVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        assert!(serde_json::from_str::<SensitivityVector>("[1.0,2.0,3.0,4.0]").is_err());
        assert!(serde_json::from_str::<SensitivityVector>(r#"{"data":[1.0,2.0,3.0]}"#).is_err());
    }
}
