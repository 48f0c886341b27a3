/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Deref, DerefMut, Index, IndexMut, Range};
use std::slice::SliceIndex;

use serde::{Deserialize, Serialize};

/// An owned, fixed-length vector of coordinates.
///
/// The length is fixed at construction; elements may be freely written
/// (through `IndexMut` or `DerefMut`), but nothing here can resize it.
/// Borrowed views are plain `&[f64]`, whose lifetimes the compiler ties
/// to the owner; [`Coords::copy_range`] is the copying alternative.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Coords(Vec<f64>);

impl Coords {
    pub fn new(data: Vec<f64>) -> Coords { Coords(data) }

    /// A vector of `len` copies of `fill`.
    pub fn from_elem(len: usize, fill: f64) -> Coords { Coords(vec![fill; len]) }

    pub fn zeros(len: usize) -> Coords { Coords::from_elem(len, 0.0) }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn as_slice(&self) -> &[f64] { &self.0 }
    pub fn as_mut_slice(&mut self) -> &mut [f64] { &mut self.0 }
    pub fn into_vec(self) -> Vec<f64> { self.0 }

    /// An owned copy of a subrange.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn copy_range(&self, range: Range<usize>) -> Coords { Coords(self.0[range].to_vec()) }

    /// Borrowed contiguous blocks of length `ndim`.
    ///
    /// # Panics
    ///
    /// Panics if `ndim` is zero.  A trailing partial block is yielded
    /// if `ndim` does not divide the length.
    pub fn blocks(&self, ndim: usize) -> std::slice::Chunks<'_, f64> { self.0.chunks(ndim) }
}

impl Deref for Coords {
    type Target = [f64];
    fn deref(&self) -> &[f64] { &self.0 }
}

impl DerefMut for Coords {
    fn deref_mut(&mut self) -> &mut [f64] { &mut self.0 }
}

impl<I: SliceIndex<[f64]>> Index<I> for Coords {
    type Output = I::Output;
    fn index(&self, i: I) -> &I::Output { &self.0[i] }
}

impl<I: SliceIndex<[f64]>> IndexMut<I> for Coords {
    fn index_mut(&mut self, i: I) -> &mut I::Output { &mut self.0[i] }
}

impl From<Vec<f64>> for Coords {
    fn from(data: Vec<f64>) -> Coords { Coords(data) }
}

impl<'a> From<&'a [f64]> for Coords {
    fn from(data: &'a [f64]) -> Coords { Coords(data.to_vec()) }
}

macro_rules! impl_from_array {
    ($($n:tt)*) => {$(
        impl From<[f64; $n]> for Coords {
            fn from(data: [f64; $n]) -> Coords { Coords(data.to_vec()) }
        }
    )*};
}

impl_from_array! {
     1  2  3  4  5  6  7  8  9 10 11 12
}

impl From<Coords> for Vec<f64> {
    fn from(Coords(data): Coords) -> Vec<f64> { data }
}

impl AsRef<[f64]> for Coords {
    fn as_ref(&self) -> &[f64] { &self.0 }
}

impl<'a> IntoIterator for &'a Coords {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl IntoIterator for Coords {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl std::iter::FromIterator<f64> for Coords {
    fn from_iter<I: IntoIterator<Item=f64>>(iter: I) -> Coords { Coords(iter.into_iter().collect()) }
}
