//! Numeric implementations of the built-in functions.

use calx_parser::parser::call::NativeFn;
use super::config::TrigMode;

/// Computes `n!` for non-negative integers. Any other input has no factorial and yields `NaN`.
pub fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 {
        return f64::NAN;
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n && result.is_finite() {
        result *= i;
        i += 1.0;
    }
    result
}

/// Evaluates a built-in function. The number of arguments has already been checked by the
/// parser; a missing optional argument takes its default.
pub fn call_native(func: NativeFn, args: &[f64], mode: TrigMode) -> f64 {
    let x = args.first().copied().unwrap_or(f64::NAN);

    let to_radians = |n: f64| match mode {
        TrigMode::Radians => n,
        TrigMode::Degrees => n.to_radians(),
    };
    let from_radians = |n: f64| match mode {
        TrigMode::Radians => n,
        TrigMode::Degrees => n.to_degrees(),
    };

    match func {
        NativeFn::Sin => to_radians(x).sin(),
        NativeFn::Cos => to_radians(x).cos(),
        NativeFn::Tan => to_radians(x).tan(),
        NativeFn::Asin => from_radians(x.asin()),
        NativeFn::Acos => from_radians(x.acos()),
        NativeFn::Atan => from_radians(x.atan()),
        NativeFn::Sinh => x.sinh(),
        NativeFn::Cosh => x.cosh(),
        NativeFn::Tanh => x.tanh(),
        NativeFn::Sqrt => x.sqrt(),
        NativeFn::Cbrt => x.cbrt(),
        NativeFn::Exp => x.exp(),
        NativeFn::Ln => x.ln(),
        NativeFn::Log => match args.get(1) {
            Some(&base) => x.log(base),
            None => x.log10(),
        },
        NativeFn::Abs => x.abs(),
        NativeFn::Floor => x.floor(),
        NativeFn::Ceil => x.ceil(),
        NativeFn::Round => x.round(),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use super::*;

    #[test]
    fn factorials() {
        assert_eq!(factorial(0.0), 1.0);
        assert_eq!(factorial(5.0), 120.0);
        assert!(factorial(2.5).is_nan());
        assert!(factorial(-1.0).is_nan());
        assert!(factorial(500.0).is_infinite());
    }

    #[test]
    fn trig_modes() {
        assert_float_relative_eq!(call_native(NativeFn::Sin, &[90.0], TrigMode::Degrees), 1.0);
        assert_float_relative_eq!(call_native(NativeFn::Sin, &[std::f64::consts::FRAC_PI_2], TrigMode::Radians), 1.0);
        assert_float_relative_eq!(call_native(NativeFn::Acos, &[0.0], TrigMode::Degrees), 90.0);
        assert_float_relative_eq!(call_native(NativeFn::Sinh, &[1.0], TrigMode::Degrees), 1f64.sinh());
    }

    #[test]
    fn logarithms() {
        assert_float_relative_eq!(call_native(NativeFn::Log, &[1000.0], TrigMode::Radians), 3.0);
        assert_float_relative_eq!(call_native(NativeFn::Log, &[8.0, 2.0], TrigMode::Radians), 3.0);
        assert_float_relative_eq!(call_native(NativeFn::Ln, &[std::f64::consts::E], TrigMode::Radians), 1.0);
    }
}
