/// Logistic function 1 / (1 + e^-x), mapping any real into (0, 1).
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed through its own output.
///
/// With `a = sigmoid(z)`, `sigmoid'(z) = a * (1 - a)`, which lets the backward
/// pass reuse the stored activation instead of the pre-activation.
#[inline]
pub fn sigmoid_prime_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_at_half() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) <= 1.0);
        assert!(sigmoid(-40.0) > 0.0);
    }

    #[test]
    fn derivative_peaks_at_quarter() {
        assert_eq!(sigmoid_prime_from_output(sigmoid(0.0)), 0.25);
    }
}
