use crate::*;
use crate::fat::*;

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::{ManuallyDrop, MaybeUninit, size_of};
use core::ptr::NonNull;



/// [`alloc::boxed::Box`] alternative that wipes the value's storage when the value is destroyed.
///
/// Dropping the box runs `T`'s destructor, then - if the allocator reports
/// [`DESTROY_ZEROES`](meta::Meta::DESTROY_ZEROES) - wipes the full footprint of the value with a
/// verified zero before the allocation is returned to the allocator.  Whatever key material,
/// plaintext, or pointer soup the destructor left behind never reaches the free list.
///
/// Moving the value *out* (via [`into_inner`](Self::into_inner) and friends) wipes the heap copy
/// the same way; the caller's copy is theirs to manage.
pub struct ZBox<T: ?Sized, A: Free> {
    allocator:  A,
    data:       NonNull<T>,
    _phantom:   PhantomData<T>,
}

// SAFETY: ✔️ (T, A) are Send
unsafe impl<T: ?Sized + Send, A: Free + Send> Send for ZBox<T, A> {}
// SAFETY: ✔️ (T, A) are Sync
unsafe impl<T: ?Sized + Sync, A: Free + Sync> Sync for ZBox<T, A> {}

impl<T: ?Sized, A: Free> Drop for ZBox<T, A> {
    fn drop(&mut self) {
        let layout = self.layout();
        // SAFETY: ✔️ `self` is going out of scope, nothing else will ever access `*self.data` again
        unsafe { self.data.as_ptr().drop_in_place() };
        if A::DESTROY_ZEROES {
            // SAFETY: ✔️ the allocation stays valid for `layout` until the free below; the value was dropped so its bytes are ours to clobber
            unsafe { wipe::erased(self.data.as_ptr().cast(), layout) };
        }
        // SAFETY: ✔️ we previously allocated `*self.data` with `(self.allocator, layout)` and will never access that allocation again
        unsafe { self.allocator.free(self.data.cast(), layout) };
    }
}

impl<T: ?Sized, A: Free> ZBox<T, A> {
    /// Retrieve the [`fat::Free`] (+ [`fat::Alloc`] + ...) associated with this [`ZBox`].
    #[inline(always)] pub fn allocator(this: &Self) -> &A { &this.allocator }
    #[inline(always)] pub(super) fn data(&self) -> NonNull<T> { self.data }
    #[inline(always)] pub(super) unsafe fn set_data(&mut self, data: NonNull<T>) { self.data = data; }
    #[inline(always)] pub(super) fn layout(&self) -> Layout { Layout::for_value(&**self) }

    /// Construct a [`ZBox`] from a pointer to raw data and an allocator that can free it.
    ///
    /// ## Safety
    /// *   `data` must point to a valid and dereferencable `T` (e.g. initialized or [`MaybeUninit`])
    /// *   `data` and its [`Layout`] must be safely freeable via `allocator`
    /// *   [`ZBox`] takes exclusive ownership over `data`
    pub unsafe fn from_raw_in(data: NonNull<T>, allocator: A) -> Self {
        Self { data, allocator, _phantom: PhantomData }
    }

    /// Construct a [`ZBox`] from a pointer to raw data, using a default-constructed allocator.
    ///
    /// ## Safety
    /// *   Same preconditions as [`from_raw_in`](Self::from_raw_in); `A::default()` can free any
    ///     instance's allocations per [`Stateless`](meta::Stateless)
    pub unsafe fn from_raw(data: NonNull<T>) -> Self where A : meta::Stateless {
        // SAFETY: ✔️ same preconditions as this fn
        unsafe { Self::from_raw_in(data, A::default()) }
    }

    /// Decompose a [`ZBox`] into a pointer to raw data and an allocator that can free it.
    ///
    /// No wipe happens here: the caller takes over the allocation, typically to reconstitute the
    /// box later via [`from_raw_in`](Self::from_raw_in).
    pub fn into_raw_with_allocator(this: Self) -> (NonNull<T>, A) {
        let this        = ManuallyDrop::new(this);
        let data        = this.data;
        // SAFETY: ✔️ `this.allocator` will never be read again, including for Drop
        let allocator   = unsafe { core::ptr::read(&this.allocator) };
        (data, allocator)
    }

    const ASSERT_A_IS_ZST_INTO_RAW : () = assert!(size_of::<A>() == 0, "A is not a ZST - it is unlikely that `data` can be freed with anything but the discarded allocator.  Prefer `ZBox::into_raw_with_allocator` to acquire `data`'s allocator as well.");
    /// Decompose a [`ZBox`] into a pointer to raw data.
    ///
    /// ## Failure modes
    /// *   Fails to compile if `A` isn't a ZST (you likely need a specific allocator, not just `A::default()`, to free the returned data)
    pub fn into_raw(this: Self) -> NonNull<T> {
        let _ = Self::ASSERT_A_IS_ZST_INTO_RAW;
        Self::into_raw_with_allocator(this).0
    }

    /// Leak a [`ZBox`] into an exclusive reference to its data.
    ///
    /// Leaked data is never wiped - there is no destruction event to wipe at.
    pub fn leak<'a>(this: Self) -> &'a mut T where A: 'a {
        let mut raw = ZBox::into_raw_with_allocator(this).0;
        // SAFETY: ✔️ `raw` points to a valid allocated `T`, and both the means of freeing and of otherwise accessing it were just discarded
        unsafe { raw.as_mut() }
    }
}

impl<T, A: Free> ZBox<T, A> {
    // Sized

    /// Move the value out of the [`ZBox`] and onto the stack.  The heap copy is wiped (when
    /// `A::DESTROY_ZEROES`) and `A`'s allocation is freed.
    pub fn into_inner(this: Self) -> T { Self::into_inner_with_allocator(this).0 }

    /// Move the value out of the [`ZBox`] and onto the stack.  The heap copy is wiped (when
    /// `A::DESTROY_ZEROES`) and `A`'s allocation is freed.  `A` is also returned, if you have use
    /// for it.
    pub fn into_inner_with_allocator(this: Self) -> (T, A) {
        let layout = this.layout();
        let (ptr, allocator) = ZBox::into_raw_with_allocator(this);
        // SAFETY: ✔️ ptr is guaranteed to point at a valid allocation of T
        let data = unsafe { ptr.as_ptr().read() };
        if A::DESTROY_ZEROES {
            // SAFETY: ✔️ the allocation stays valid for `layout` until the free below; the value was moved out so its bytes are ours to clobber
            unsafe { wipe::erased(ptr.as_ptr().cast(), layout) };
        }
        // SAFETY: ✔️ ptr is guaranteed to point at a valid allocation belonging to allocator (decomposed from the same box) with the box-known layout
        unsafe { allocator.free(ptr.cast(), layout) };
        (data, allocator)
    }
}

impl<T, A: Free> ZBox<MaybeUninit<T>, A> {
    // MaybeUninit<T>

    pub(super) unsafe fn assume_init(self) -> ZBox<T, A> {
        let (data, allocator) = ZBox::into_raw_with_allocator(self);
        // SAFETY: ✔️ we just decomposed (data, allocator) from a compatible-layout box
        unsafe { ZBox::from_raw_in(data.cast(), allocator) }
    }

    pub(super) fn write(boxed: Self, value: T) -> ZBox<T, A> {
        // SAFETY: ✔️ boxed.data is guaranteed to point at a valid allocation of T
        unsafe { boxed.data.as_ptr().write(MaybeUninit::new(value)) };
        // SAFETY: ✔️ we just wrote to `boxed`
        unsafe { boxed.assume_init() }
    }
}

impl<T, A: Free> ZBox<[MaybeUninit<T>], A> {
    // [MaybeUninit<T>]

    pub(super) unsafe fn assume_init(self) -> ZBox<[T], A> {
        let (data, allocator) = ZBox::into_raw_with_allocator(self);
        let data = util::nn::slice_from_raw_parts(data.cast(), data.len());
        // SAFETY: ✔️ we just decomposed (data, allocator) from a compatible-layout box
        unsafe { ZBox::from_raw_in(data, allocator) }
    }
}
