//! Permissive conversions from decoded scalars into primitive Rust types.
//!
//! The typed mapper funnels every scalar it binds through [`Coerce`]. The
//! conversion never fails; a scalar that has no defined conversion to the
//! requested type resolves to `None`, which callers treat as "drop this
//! value" rather than as an error.

use crate::mapper::Scalar;

/// A conversion that never fails, only declines.
///
/// Rules, in order: an identical representation passes through; a boolean
/// target treats the string `"true"` as true and nonzero-tests anything
/// else numeric; a textual target takes the scalar's default text rendering;
/// a numeric target converts through an `f64` intermediate and narrows to
/// the requested width, with booleans counting as 1 and 0. `Scalar::Null`
/// declines every conversion.
///
/// ```
/// use jsonbind::{Coerce, Scalar};
///
/// assert_eq!(u8::coerce(Scalar::String("42".to_owned())), Some(42));
/// assert_eq!(bool::coerce(Scalar::String("0".to_owned())), Some(false));
/// assert_eq!(String::coerce(Scalar::Null), None);
/// ```
pub trait Coerce: Sized {
    /// Convert a decoded scalar into `Self`, or `None` when no conversion
    /// is defined.
    fn coerce(scalar: Scalar) -> Option<Self>;
}

/// The floating-point intermediate shared by the boolean and numeric rules.
///
/// Strings that do not parse as a number count as zero, matching the
/// permissive contract: coercion narrows or zeroes, it never reports.
fn to_f64(scalar: Scalar) -> Option<f64> {
    match scalar {
        Scalar::Null => None,
        Scalar::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Scalar::Number(n) => n.as_f64(),
        Scalar::String(s) => Some(s.parse().unwrap_or(0.0)),
    }
}

impl Coerce for bool {
    fn coerce(scalar: Scalar) -> Option<bool> {
        match scalar {
            Scalar::Bool(b) => Some(b),
            Scalar::String(s) if s == "true" => Some(true),
            other => to_f64(other).map(|f| f != 0.0),
        }
    }
}

impl Coerce for String {
    fn coerce(scalar: Scalar) -> Option<String> {
        match scalar {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::String(s) => Some(s),
        }
    }
}

impl Coerce for f64 {
    fn coerce(scalar: Scalar) -> Option<f64> {
        to_f64(scalar)
    }
}

impl Coerce for f32 {
    fn coerce(scalar: Scalar) -> Option<f32> {
        to_f64(scalar).map(|f| f as f32)
    }
}

macro_rules! impl_coerce_signed {
    ($($ty:ident)*) => {
        $(
            impl Coerce for $ty {
                fn coerce(scalar: Scalar) -> Option<$ty> {
                    // Integers already in range convert exactly; everything
                    // else takes the f64 intermediate, which truncates toward
                    // zero and saturates at the target bounds.
                    if let Scalar::Number(n) = &scalar {
                        if let Some(exact) = n.as_i64().and_then(|i| $ty::try_from(i).ok()) {
                            return Some(exact);
                        }
                    }
                    to_f64(scalar).map(|f| f as $ty)
                }
            }
        )*
    };
}

macro_rules! impl_coerce_unsigned {
    ($($ty:ident)*) => {
        $(
            impl Coerce for $ty {
                fn coerce(scalar: Scalar) -> Option<$ty> {
                    if let Scalar::Number(n) = &scalar {
                        if let Some(exact) = n.as_u64().and_then(|u| $ty::try_from(u).ok()) {
                            return Some(exact);
                        }
                    }
                    to_f64(scalar).map(|f| f as $ty)
                }
            }
        )*
    };
}

impl_coerce_signed!(i8 i16 i32 i64 isize);
impl_coerce_unsigned!(u8 u16 u32 u64 usize);

#[cfg(test)]
mod tests {
    use super::Coerce;
    use crate::mapper::Scalar;
    use crate::number::Number;

    fn number(f: f64) -> Scalar {
        Scalar::Number(Number::from_f64(f).unwrap())
    }

    fn string(s: &str) -> Scalar {
        Scalar::String(s.to_owned())
    }

    #[test]
    fn null_declines_every_target() {
        assert_eq!(bool::coerce(Scalar::Null), None);
        assert_eq!(String::coerce(Scalar::Null), None);
        assert_eq!(i32::coerce(Scalar::Null), None);
        assert_eq!(f64::coerce(Scalar::Null), None);
    }

    #[test]
    fn bool_rules() {
        assert_eq!(bool::coerce(Scalar::Bool(true)), Some(true));
        assert_eq!(bool::coerce(string("true")), Some(true));
        assert_eq!(bool::coerce(string("false")), Some(false));
        assert_eq!(bool::coerce(string("1.5")), Some(true));
        assert_eq!(bool::coerce(string("0")), Some(false));
        assert_eq!(bool::coerce(string("xyz")), Some(false));
        assert_eq!(bool::coerce(number(0.0)), Some(false));
        assert_eq!(bool::coerce(number(-3.0)), Some(true));
    }

    #[test]
    fn string_rules() {
        assert_eq!(String::coerce(string("abc")), Some("abc".to_owned()));
        assert_eq!(String::coerce(Scalar::Bool(true)), Some("true".to_owned()));
        assert_eq!(
            String::coerce(Scalar::Number(Number::from(1234u32))),
            Some("1234".to_owned())
        );
        assert_eq!(String::coerce(number(0.12)), Some("0.12".to_owned()));
    }

    #[test]
    fn numeric_rules() {
        assert_eq!(i32::coerce(Scalar::Number(Number::from(123u32))), Some(123));
        assert_eq!(i32::coerce(string("42")), Some(42));
        assert_eq!(i32::coerce(string("xyz")), Some(0));
        assert_eq!(i32::coerce(Scalar::Bool(true)), Some(1));
        assert_eq!(u64::coerce(Scalar::Bool(false)), Some(0));
        assert_eq!(f64::coerce(string("0.5")), Some(0.5));
        assert_eq!(f32::coerce(number(0.25)), Some(0.25f32));
    }

    #[test]
    fn narrowing_truncates_and_saturates() {
        assert_eq!(i32::coerce(number(1.9)), Some(1));
        assert_eq!(i32::coerce(number(-1.9)), Some(-1));
        assert_eq!(u8::coerce(Scalar::Number(Number::from(300u32))), Some(255));
        assert_eq!(u32::coerce(Scalar::Number(Number::from(-1i32))), Some(0));
    }

    #[test]
    fn in_range_integers_convert_exactly() {
        assert_eq!(
            u64::coerce(Scalar::Number(Number::from(u64::MAX))),
            Some(u64::MAX)
        );
        assert_eq!(
            i64::coerce(Scalar::Number(Number::from(i64::MIN))),
            Some(i64::MIN)
        );
    }
}
