//! Declared wire kinds for scalar values.
//!
//! The serialization policy picks a converter by the *declared* kind of a
//! value rather than by inspecting the encoded JSON, so a version-options
//! token such as `"3"` is never confused with a plain number.

/// Declared kind of a scalar wire value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// [`crate::VersionOptions`]
    VersionOptions,
    /// A fieldless enum encoded by member name
    Enum,
    /// Strings, numbers, booleans
    Scalar,
}

/// Types that can travel as a single token (query parameter, header value).
pub trait WireValue {
    /// Kind used to select a converter.
    const KIND: WireKind;
}

macro_rules! scalar_wire_value {
    ($($ty:ty),* $(,)?) => {
        $(impl WireValue for $ty {
            const KIND: WireKind = WireKind::Scalar;
        })*
    };
}

scalar_wire_value!(bool, i32, i64, u32, u64, usize, String, str);

impl<T: WireValue + ?Sized> WireValue for &T {
    const KIND: WireKind = T::KIND;
}
