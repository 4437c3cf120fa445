/// Asserts that the fit's r² value relative to its source data is above a threshold.
///
/// Threshold defaults to 0.9.
///
/// ```rust
/// # use chirpfit::{ChebyshevFit, assert_r_squared};
/// let data: Vec<_> = (0..20).map(|i| (i as f64, (i as f64).sin())).collect();
/// let fit = ChebyshevFit::new(&data, 15).unwrap();
/// assert_r_squared!(&fit, 0.99);
/// ```
#[macro_export]
macro_rules! assert_r_squared {
    ($fit:expr $(, msg = $msg:literal $(, $($args:tt),*)?)?) => {
        $crate::assert_r_squared!(
            $fit,
            $crate::value::Value::try_cast(0.9)
                .expect("Failed to cast 0.9 for assert_r_squared! threshold")
            $(, msg = $msg $(, $($args),*)?)?
        )
    };

    ($fit:expr, $r2:expr $(, msg = $msg:literal $(, $($args:tt),*)?)?) => {
        #[allow(clippy::toplevel_ref_arg)]
        {
            let ref fit = $fit;
            let threshold = $r2;
            let r2 = fit.r_squared();

            if r2 <= threshold || !$crate::value::Value::finite(r2) {
                #[allow(unused_mut, unused_assignments)] let mut msg = format!("R² = {r2} is below {threshold}");
                $( msg = format!("{msg}: {}", format!($msg, $($($args)?)?)); )?

                panic!("{msg}");
            }
        }
    };
}

/// Asserts that every residual of a fit is at most `max` in magnitude.
///
/// # Panics
/// Panics if the largest absolute residual exceeds `max`.
///
/// # Example
/// ```rust
/// # use chirpfit::{ChebyshevFit, assert_max_residual};
/// let fit = ChebyshevFit::new(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)], 1).unwrap();
/// assert_max_residual!(fit, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_max_residual {
    ($fit:expr, $max:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {
        #[allow(clippy::toplevel_ref_arg)]
        {
            let ref fit = $fit;
            let max = $max;
            let worst = fit.max_abs_residual();

            if worst > max || !$crate::value::Value::finite(worst) {
                #[allow(unused_mut, unused_assignments)] let mut msg = format!(
                    "Residuals above threshold - max={worst:e}/{max:e}"
                );
                $( msg = format!("{msg}: {}", format!($msg, $($($args)?)?)); )?

                panic!("{msg}");
            }
        }
    };
}

/// Asserts that evaluating a polynomial at a given `x` matches the expected `y` value
/// within floating-point epsilon tolerance.
///
/// Useful for spot-checking specific predictions of the model.
///
/// # Arguments
///
/// * `$function` - The polynomial or fit under test (must implement `AsRef<Polynomial<...>>`).
/// * `$x` - The input `x` value where the polynomial is evaluated.
/// * `$expected` - The expected result of the polynomial evaluation.
///
/// # Panics
///
/// Panics if the evaluated value differs from the expected value
/// by more than machine epsilon for the type `T`.
///
/// # Example
/// ```
/// use chirpfit::{basis::ChebyshevBasis, assert_y};
///
/// let poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[8.0, 7.0]).unwrap();
/// assert_y!(poly, 1.0, 15.0);
/// ```
#[macro_export]
macro_rules! assert_y {
    ($function:expr, $x:expr, $expected:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {{
        let function = &$function;
        let function: &$crate::Polynomial<_, _> = function.as_ref();
        let x = $x;
        let expected = $expected;

        #[allow(unused_mut, unused_assignments)] let mut msg = format!("y({x}) != {expected}");
        $( msg = format!("{msg}: {}", format!($msg, $($($args)?)?)); )?

        $crate::assert_close!(function.y(x), expected, "{msg}");
    }};
}

/// Asserts that two floating-point values are approximately equal within a small tolerance.
///
/// This is useful for comparing computed values where exact equality is not expected due to rounding errors.
/// - Uses the machine epsilon for the floating-point type as the tolerance, unless `tol = ...` is given.
/// - `assert_eq!` equivalent for floats.
///
/// # Parameters
/// - `$a`: First value.
/// - `$b`: Second value.
/// - `tol`: *(optional)* Absolute tolerance.
/// - `$msg`: Custom failure message.
///
/// # Panics
/// Panics if the absolute difference `|a - b|` exceeds the tolerance.
///
/// # Examples
/// ```
/// # use chirpfit::assert_close;
/// assert_close!(1.0 + 1e-16, 1.0, "Nearly equal");
/// assert_close!(1.0 + 1e-9, 1.0, tol = 1e-8);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($msg, $($($args)?)?); )?

        let (a, b, tol) = ($a, $b, $tol);
        assert!(
            a == b || $crate::value::Value::abs(a - b) <= tol,
            "{msg}: {a:?} != {b:?} (tol {tol:?})"
        );
    }};

    ($a:expr, $b:expr $(, $msg:literal $(, $($args:tt),*)?)?) => { #[allow(clippy::float_cmp)] {
        fn epsilon<T: $crate::value::Value>(_: T) -> T {
            T::epsilon()
        }

        let a = $a;
        $crate::assert_close!(a, $b, tol = epsilon(a) $(, $msg $(, $($args),*)?)?);
    }};
}

/// Asserts that two slices of floating-point values are approximately equal element-wise within a small tolerance (epsilon).
///
/// - Element-wise [`crate::assert_close`].
///
/// # Parameters
/// - `$src`: Source slice (implements `iter()`).
/// - `$dst`: Destination slice (same length as `$src`).
/// - `tol`: *(optional)* Absolute tolerance.
/// - `$msg`: *(optional)* Custom failure message. Defaults to `"{len} elements"`.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements differ by more than the tolerance.
///
/// # Examples
/// ```
/// # use chirpfit::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0 + 1e-16, 2.0, 3.0];
///
/// assert_all_close!(a, b); // OK
/// assert_all_close!(a, b, "Vectors must match"); // Custom message
/// assert_all_close!(a, b, tol = 1e-12);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tol = $tol:expr $(, $msg:literal $(, $($args:tt),*)?)?) => {
        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", $src.len());
        $(
            msg = format!($msg, $($($args)?)?);
        )?

        assert_eq!($src.len(), $dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in $src.iter().zip($dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tol = $tol, "{msg} - src[{i}]");
        }
    };

    ($src:expr, $dst:expr  $(, $msg:literal $(, $($args:tt),*)?)?) => {
        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", $src.len());
        $(
            msg = format!($msg, $($($args)?)?);
        )?

        assert_eq!($src.len(), $dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in $src.iter().zip($dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "{msg} - src[{i}]");
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{basis::ChebyshevBasis, ChebyshevFit};

    #[test]
    fn test_assert_y_macro() {
        // T0 + 2·T1 + 3·T2 at u = 1
        let poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[1.0, 2.0, 3.0]).unwrap();
        assert_y!(poly, 1.0, 6.0);
    }

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, "Values should be close");
        assert_close!(1.0 + 1e-10, 1.0, tol = 1e-9);
        assert_close!(1.0 + 1e-10, 1.0, tol = 1e-9, "with {}", "message");
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_macro_fails() {
        assert_close!(1.0 + 1e-6, 1.0, tol = 1e-9);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b, "Vectors must match");
        assert_all_close!(a, b, tol = 1e-12);
    }

    #[test]
    fn test_fit_macros() {
        let data: Vec<_> = (0..50)
            .map(|i| {
                let x = f64::from(i) / 10.0;
                (x, 1.0 + 2.0 * x - 0.5 * x * x)
            })
            .collect();
        let fit = ChebyshevFit::new(&data, 2).unwrap();
        assert_r_squared!(&fit, 0.999);
        assert_r_squared!(&fit, msg = "test");
        assert_max_residual!(&fit, 1e-10);
        assert_close!(fit.as_polynomial().y(1.0), 2.5, tol = 1e-10);
    }
}
