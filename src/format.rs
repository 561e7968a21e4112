/// Float formatting for .for output and tolerance rounding helpers.
use crate::constants::PRECISION_FOR_FLOAT;

/// Formats a float with 8 significant digits, trailing zeros and a trailing
/// decimal point removed. Magnitudes that would normally print in scientific
/// notation take a fixed-notation fallback instead; the output never
/// contains an exponent.
pub fn float_to_str(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let digits = PRECISION_FOR_FLOAT as i32;
    let exponent = n.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits {
        // The range where "{:.8e}"-style output would be chosen.
        strip_fixed(format!("{:.*}", PRECISION_FOR_FLOAT, n))
    } else {
        let decimals = (digits - 1 - exponent).max(0) as usize;
        strip_fixed(format!("{:.*}", decimals, n))
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(n: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (n * scale).round() / scale
}

fn strip_fixed(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_lose_the_decimal_point() {
        assert_eq!(float_to_str(1.0), "1");
        assert_eq!(float_to_str(-16.0), "-16");
        assert_eq!(float_to_str(0.0), "0");
    }

    #[test]
    fn fractions_keep_only_meaningful_digits() {
        assert_eq!(float_to_str(1.5), "1.5");
        assert_eq!(float_to_str(0.25), "0.25");
        assert_eq!(float_to_str(-2.125), "-2.125");
        assert_eq!(float_to_str(33.333333333333), "33.333333");
    }

    #[test]
    fn tiny_values_never_use_scientific_notation() {
        assert_eq!(float_to_str(0.000000001), "0");
        assert_eq!(float_to_str(0.00001), "0.00001");
        assert!(!float_to_str(1e-7).contains('e'));
    }

    #[test]
    fn large_values_never_use_scientific_notation() {
        assert_eq!(float_to_str(123456789.0), "123456789");
        assert!(!float_to_str(1e10).contains('e'));
    }

    #[test]
    fn round_to_decimal_places() {
        assert_eq!(round_to(0.333333, 2), 0.33);
        assert_eq!(round_to(89.9999999, 5), 90.0);
        assert_eq!(round_to(1.005, 1), 1.0);
    }
}
