/// [`panic!`] over detected undefined behavior.  May someday lower to
/// [`core::hint::unreachable_unchecked`] in release builds, so every use site is required to sit
/// inside an `unsafe` block documenting the violated precondition.
macro_rules! ub {
    ( $($tt:tt)* ) => {{
        $crate::_macros::report_undefined_behavior();
        panic!($($tt)*);
    }};
}



/// ### Safety
///
/// Some build configurations may replace this with [`core::hint::unreachable_unchecked`].
pub unsafe fn report_undefined_behavior() {}
