// src/utils/interp.rs

/// Fractional position of `t` between `t0` and `t1`, or `None` when the interval is degenerate.
pub fn fraction(t: f64, t0: f64, t1: f64) -> Option<f64> {
    let span = t1 - t0;
    if span == 0.0 {
        None
    } else {
        Some((t - t0) / span)
    }
}

#[inline]
pub fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        assert_eq!(fraction(2.5, 2.0, 3.0), Some(0.5));
        assert_eq!(fraction(2.0, 2.0, 3.0), Some(0.0));
        assert_eq!(fraction(1.0, 1.0, 1.0), None);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(-1.0, 1.0, 0.25), -0.5);
    }
}
