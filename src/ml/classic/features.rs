use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};

/// Conversion into a dense feature vector.
///
/// Accepts flat numeric sequences (`Vec`, slices, arrays), one-dimensional
/// `ndarray` arrays, single-row two-dimensional arrays, and bare scalars for
/// one-dimensional data. Every element must be representable as a finite
/// `f64`.
///
/// The length is not checked here; the classifier compares it against its
/// own dimensionality.
///
/// # Example
///
/// ```
/// use knn_classifier::IntoFeatureVector;
///
/// let v = vec![1_i32, 2, 3].into_feature_vector().unwrap();
/// assert_eq!(v.to_vec(), vec![1.0, 2.0, 3.0]);
///
/// assert!(vec![1.0, f64::NAN].into_feature_vector().is_err());
/// ```
pub trait IntoFeatureVector {
    fn into_feature_vector(self) -> Result<Array1<f64>>;
}

/// Collects `values` into an `Array1<f64>`, rejecting anything non-finite.
fn collect_finite<I, T>(values: I) -> Result<Array1<f64>>
where
    I: IntoIterator<Item = T>,
    T: ToPrimitive,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value.to_f64() {
            Some(x) if x.is_finite() => Ok(x),
            Some(x) => Err(Error::InvalidInput(format!(
                "element {i} is not finite ({x})"
            ))),
            None => Err(Error::InvalidInput(format!(
                "element {i} is not representable as f64"
            ))),
        })
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from)
}

impl<T: ToPrimitive + Copy> IntoFeatureVector for Vec<T> {
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self)
    }
}

impl<T: ToPrimitive + Copy> IntoFeatureVector for &Vec<T> {
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self.iter().copied())
    }
}

impl<T: ToPrimitive + Copy> IntoFeatureVector for &[T] {
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self.iter().copied())
    }
}

impl<T: ToPrimitive + Copy, const N: usize> IntoFeatureVector for [T; N] {
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self)
    }
}

impl<T: ToPrimitive + Copy, const N: usize> IntoFeatureVector for &[T; N] {
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self.iter().copied())
    }
}

impl<S, T> IntoFeatureVector for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: ToPrimitive + Copy,
{
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self.iter().copied())
    }
}

impl<S, T> IntoFeatureVector for &ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: ToPrimitive + Copy,
{
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        collect_finite(self.iter().copied())
    }
}

/// A `1 × d` matrix is treated as a single row vector.
impl<S, T> IntoFeatureVector for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
    T: ToPrimitive + Copy,
{
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        (&self).into_feature_vector()
    }
}

impl<S, T> IntoFeatureVector for &ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
    T: ToPrimitive + Copy,
{
    fn into_feature_vector(self) -> Result<Array1<f64>> {
        let (rows, cols) = self.dim();
        if rows != 1 {
            return Err(Error::InvalidInput(format!(
                "expected a single row, got a {rows}x{cols} matrix"
            )));
        }
        collect_finite(self.iter().copied())
    }
}

macro_rules! scalar_feature_vector {
    ($($t:ty),*) => {
        $(
            impl IntoFeatureVector for $t {
                fn into_feature_vector(self) -> Result<Array1<f64>> {
                    collect_finite([self])
                }
            }
        )*
    };
}

scalar_feature_vector!(f64, f32, i32, i64, u32, usize);
