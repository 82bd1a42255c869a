//! Bounded-denominator rational approximation.

use num_rational::Ratio;

/// Largest denominator kept when reducing a time value before encoding.
pub const MAX_DENOMINATOR: i128 = 1_000_000;

/// Find the closest rational to `value` whose denominator is at most
/// `max_denominator`.
///
/// Walks the continued-fraction convergents of `value` until the next one
/// would exceed the bound, then picks whichever of the last convergent and
/// the best semiconvergent lies closer. Ties go to the convergent.
///
/// `value` must be non-negative and `max_denominator` at least 1.
pub fn limit_denominator(value: Ratio<i128>, max_denominator: i128) -> Ratio<i128> {
    if *value.denom() <= max_denominator {
        return value;
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0i128, 1i128, 1i128, 0i128);
    let (mut n, mut d) = (*value.numer(), *value.denom());

    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_denominator {
            break;
        }
        let p2 = p0 + a * p1;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;
        let r = n - a * d;
        n = d;
        d = r;
    }

    let k = (max_denominator - q0) / q1;
    let bound1 = Ratio::new(p0 + k * p1, q0 + k * q1);
    let bound2 = Ratio::new(p1, q1);

    if distance(bound2, value) <= distance(bound1, value) {
        bound2
    } else {
        bound1
    }
}

fn distance(a: Ratio<i128>, b: Ratio<i128>) -> Ratio<i128> {
    if a > b {
        a - b
    } else {
        b - a
    }
}
