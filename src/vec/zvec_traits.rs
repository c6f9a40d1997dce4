use crate::fat::*;
use crate::vec::ZVec;

use core::borrow::{Borrow, BorrowMut};
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};



// (Auto)Derefs

impl<T, A: Free> Deref      for ZVec<T, A> { type Target = [T]; fn deref(&self) -> &[T] { self.as_slice() } }
impl<T, A: Free> DerefMut   for ZVec<T, A> { fn deref_mut(&mut self) -> &mut [T] { self.as_slice_mut() } }

impl<T, A: Free> AsRef<[T]>     for ZVec<T, A> { fn as_ref(&self)            -> &[T]     { self } }
impl<T, A: Free> AsMut<[T]>     for ZVec<T, A> { fn as_mut(&mut self)        -> &mut [T] { self } }
impl<T, A: Free> Borrow<[T]>    for ZVec<T, A> { fn borrow(&self)            -> &[T]     { self } }
impl<T, A: Free> BorrowMut<[T]> for ZVec<T, A> { fn borrow_mut(&mut self)    -> &mut [T] { self } }



// Formatting

impl<T: Debug, A: Free> Debug for ZVec<T, A> { fn fmt(&self, fmt: &mut Formatter) -> fmt::Result { self.as_slice().fmt(fmt) } }



// Misc. Operators

impl<T: Eq,   A: Free> Eq   for ZVec<T, A> {}
impl<T: Hash, A: Free> Hash for ZVec<T, A> { fn hash<H: Hasher>(&self, state: &mut H) { self.as_slice().hash(state) } }

impl<T: PartialEq, A: Free, A2: Free> PartialEq<ZVec<T, A2>> for ZVec<T, A> {
    fn eq(&self, other: &ZVec<T, A2>) -> bool { self.as_slice() == other.as_slice() }
}

impl<T: PartialEq, A: Free> PartialEq<[T]> for ZVec<T, A> {
    fn eq(&self, other: &[T]) -> bool { self.as_slice() == other }
}

impl<T: PartialEq, A: Free, const N: usize> PartialEq<[T; N]> for ZVec<T, A> {
    fn eq(&self, other: &[T; N]) -> bool { self.as_slice() == other }
}



// Iteration

impl<'a, T, A: Free> IntoIterator for &'a ZVec<T, A> {
    type Item     = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.as_slice().iter() }
}

impl<'a, T, A: Free> IntoIterator for &'a mut ZVec<T, A> {
    type Item     = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.as_slice_mut().iter_mut() }
}

#[cfg(feature = "panicy-memory")]
impl<T, A: Realloc> Extend<T> for ZVec<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter { self.push(value) }
    }
}
