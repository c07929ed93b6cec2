//! Extended Euclidean algorithm

use num_traits::Signed;

/// Extended GCD with sign handling.
///
/// Returns `(g, s, t)` with `g = gcd(|r0|, |r1|) >= 0` and
/// `g = s·r0 + t·r1`. The recurrence runs on absolute values; the signs of
/// the inputs are folded back into the Bézout coefficients at the end.
///
/// `extended_gcd(0, 0)` returns `(0, 1, 0)`. Works for any signed integer
/// type (`i64`, `BigInt`, ...); for fixed-width types the inputs must not be
/// the type's minimum value, whose absolute value is not representable.
///
/// ```rust
/// use ggh_lattice::extended_gcd;
///
/// let (g, s, t) = extended_gcd(240i64, -46);
/// assert_eq!(g, 2);
/// assert_eq!(s * 240 + t * -46, 2);
/// ```
pub fn extended_gcd<T: Signed + Clone>(r0: T, r1: T) -> (T, T, T) {
    let sign0 = if r0.is_negative() { -T::one() } else { T::one() };
    let sign1 = if r1.is_negative() { -T::one() } else { T::one() };
    let (mut r0, mut r1) = (r0.abs(), r1.abs());

    let (mut x0, mut x1) = (T::one(), T::zero());
    let (mut y0, mut y1) = (T::zero(), T::one());

    while !r1.is_zero() {
        let q = r0.clone() / r1.clone();
        let r = r0 % r1.clone();
        r0 = r1;
        r1 = r;

        let x = x0 - q.clone() * x1.clone();
        x0 = x1;
        x1 = x;

        let y = y0 - q * y1.clone();
        y0 = y1;
        y1 = y;
    }

    (r0, sign0 * x0, sign1 * y0)
}
