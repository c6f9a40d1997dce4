use crate::boxed::ZBox;
use crate::fat::*;

use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};



// (Auto)Derefs

impl<T: ?Sized, A: Free> Deref for ZBox<T, A> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: ✔️ `ZBox::data` always points at a valid `T` that we have exclusive access to
        unsafe { self.data().as_ref() }
    }
}

impl<T: ?Sized, A: Free> DerefMut for ZBox<T, A> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: ✔️ `ZBox::data` always points at a valid `T` that we have exclusive access to
        unsafe { self.data().as_mut() }
    }
}

impl<T: ?Sized, A: Free> AsMut<T>       for ZBox<T, A> { fn as_mut(&mut self)        -> &mut T   { self } }
impl<T: ?Sized, A: Free> AsRef<T>       for ZBox<T, A> { fn as_ref(&self)            -> &T       { self } }
impl<T: ?Sized, A: Free> Borrow<T>      for ZBox<T, A> { fn borrow(&self)            -> &T       { self } }
impl<T: ?Sized, A: Free> BorrowMut<T>   for ZBox<T, A> { fn borrow_mut(&mut self)    -> &mut T   { self } }



// Formatting

impl<T: ?Sized + Debug,   A: Free> Debug   for ZBox<T, A> { fn fmt(&self, fmt: &mut Formatter) -> fmt::Result { T::fmt(self, fmt) } }
impl<T: ?Sized + Display, A: Free> Display for ZBox<T, A> { fn fmt(&self, fmt: &mut Formatter) -> fmt::Result { T::fmt(self, fmt) } }



// Misc. Operators

impl<T: ?Sized + Eq,   A: Free> Eq   for ZBox<T, A> {}
impl<T: ?Sized + Ord,  A: Free> Ord  for ZBox<T, A> { fn cmp(&self, other: &Self) -> Ordering { T::cmp(self, other) } }
impl<T: ?Sized + Hash, A: Free> Hash for ZBox<T, A> { fn hash<H: Hasher>(&self, state: &mut H) { T::hash::<H>(self, state) } }

impl<T: ?Sized + PartialEq, A: Free> PartialEq for ZBox<T, A> {
    fn eq(&self, other: &Self) -> bool { T::eq(self, other) }
}

impl<T: ?Sized + PartialOrd, A: Free> PartialOrd for ZBox<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { T::partial_cmp(self, other) }
}
