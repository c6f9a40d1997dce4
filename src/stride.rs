//! Fill stride selection: the widest unsigned integral type whose alignment evenly divides a target type's alignment
//!
//! Overwriting a buffer a word at a time instead of a byte at a time needs a
//! word type the buffer is guaranteed to be aligned for.  Candidates are tried
//! widest first; a single byte trivially qualifies for anything, including
//! type-erased spans where no alignment information exists, so selection is
//! total.

use core::alloc::Layout;
use core::mem::{align_of, size_of};



/// Fill stride (in bytes) for spans holding instances of `T`.
///
/// Guarantees, for the returned stride `s`:
/// *   `align_of::<T>()` is a multiple of the alignment of the `s`-byte unsigned integral
/// *   `size_of::<T>()` is a multiple of `s`
pub const fn of<T>() -> usize { select(align_of::<T>(), size_of::<T>()) }

/// Fill stride (in bytes) for a type-erased span described by `layout`.
pub const fn for_layout(layout: Layout) -> usize { select(layout.align(), layout.size()) }

const fn select(align: usize, size: usize) -> usize {
    if      compatible::<u64>(align, size) { size_of::<u64>() }
    else if compatible::<u32>(align, size) { size_of::<u32>() }
    else if compatible::<u16>(align, size) { size_of::<u16>() }
    else                                   { size_of::<u8 >() }
}

const fn compatible<S>(align: usize, size: usize) -> bool {
    align % align_of::<S>() == 0 && size % size_of::<S>() == 0
}



#[cfg(test)] mod tests {
    use super::*;

    fn assert_selected<T>() {
        let s = of::<T>();
        let s_align = match s { 8 => align_of::<u64>(), 4 => align_of::<u32>(), 2 => align_of::<u16>(), 1 => align_of::<u8>(), _ => panic!("stride {s} is not an unsigned integral width") };
        assert_eq!(0, align_of::<T>() % s_align, "stride alignment must divide the target's alignment");
        assert_eq!(0, size_of::<T>() % s,        "target size must be an exact multiple of the stride");
    }

    #[test] fn unsigned_integrals() {
        assert_selected::<u8 >();
        assert_selected::<u16>();
        assert_selected::<u32>();
        assert_selected::<u64>();
        assert_eq!(1, of::<u8 >());
        assert_eq!(2, of::<u16>());
        assert_eq!(4, of::<u32>());
    }

    #[test] fn floats_and_pointers() {
        assert_selected::<f32>();
        assert_selected::<f64>();
        assert_selected::<usize>();
        assert_selected::<*const u8>();
        assert_selected::<*mut ()>();
        assert_eq!(4, of::<f32>());
    }

    #[test] fn aggregates() {
        #[repr(C, align(16))] struct OverAligned([u8; 32]);
        struct Odd([u8; 3]);
        assert_selected::<OverAligned>();
        assert_selected::<Odd>();
        assert_eq!(1, of::<Odd>()); // 3 bytes can't be filled in wider words
        assert_eq!(8, of::<OverAligned>());
    }

    #[test] fn zsts_fall_back_to_bytes() {
        assert_eq!(1, of::<()>());
        assert_selected::<()>();
    }

    #[test] fn erased_layouts() {
        // no element type available - the `void` case - still total
        let l = Layout::from_size_align(24, 8).unwrap();
        assert_eq!(8, for_layout(l));
        let l = Layout::from_size_align(13, 1).unwrap();
        assert_eq!(1, for_layout(l));
        let l = Layout::from_size_align(6, 2).unwrap();
        assert_eq!(2, for_layout(l));
    }
}
