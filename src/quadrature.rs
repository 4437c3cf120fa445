//! Adaptive Gauss-Kronrod quadrature
//!
//! Definite integrals of a scalar function over a finite interval, with an absolute
//! error estimate, in the manner of QUADPACK's `QAG` routine:
//!
//! - [`gauss_kronrod_21`]: one application of the 10-point Gauss / 21-point Kronrod pair.
//!   The difference between the two rules, scaled by how smooth the integrand looks,
//!   gives the error estimate.
//! - [`integrate`]: global adaptive bisection. The subinterval with the largest error is
//!   split until the summed error meets `max(epsabs, epsrel·|area|)`, or a termination
//!   condition in [`QuadratureStatus`] is hit.
//!
//! A result that did not converge is still returned, with its status, rather than an error.
//!
//! # Example
//! ```rust
//! use chirpfit::quadrature::{integrate, QuadratureOptions, QuadratureStatus};
//!
//! let area = integrate(f64::sin, 0.0, std::f64::consts::PI, &QuadratureOptions::default()).unwrap();
//! assert!((area.value - 2.0).abs() < 1e-12);
//! assert_eq!(area.status, QuadratureStatus::Converged);
//! ```
use crate::error::{Error, Result};

/// Kronrod abscissae on [0, 1], descending. Odd indices are the 10-point Gauss abscissae.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

/// Kronrod weights, matching [`XGK`].
const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_958_109_831_074,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// Gauss weights for `XGK[1], XGK[3], … XGK[9]`.
const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Function evaluations per application of the 21-point rule.
const RULE_EVALUATIONS: usize = 21;

/// Tolerances and limits for [`integrate`].
///
/// Defaults are `epsabs = epsrel = 1.49e-8` and at most 50 subintervals.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuadratureOptions {
    /// Absolute error target.
    pub epsabs: f64,

    /// Relative error target.
    pub epsrel: f64,

    /// Maximum number of subintervals.
    pub limit: usize,
}
impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            epsabs: 1.49e-8,
            epsrel: 1.49e-8,
            limit: 50,
        }
    }
}
impl QuadratureOptions {
    /// Checks that the tolerances can be met and the limit allows at least one interval.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] on a zero limit, a non-finite or negative tolerance,
    /// or when `epsabs <= 0` and `epsrel` is below `50ε`.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfig(
                "quadrature limit must be at least 1".into(),
            ));
        }

        let tolerances = [self.epsabs, self.epsrel];
        if tolerances.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "quadrature tolerances must be finite and non-negative, got epsabs={} epsrel={}",
                self.epsabs, self.epsrel
            )));
        }

        if self.epsabs <= 0.0 && self.epsrel < 50.0 * f64::EPSILON {
            return Err(Error::InvalidConfig(format!(
                "epsrel={} is unattainable without an absolute tolerance",
                self.epsrel
            )));
        }

        Ok(())
    }
}

/// Why [`integrate`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureStatus {
    /// The requested accuracy was reached.
    Converged,

    /// The subinterval limit was reached first.
    SubdivisionLimit,

    /// Rounding error prevents reaching the requested accuracy.
    RoundoffDetected,

    /// The integrand misbehaves (e.g. a singularity) somewhere in the interval.
    BadIntegrand,
}
impl QuadratureStatus {
    /// Returns `true` if the requested accuracy was reached.
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}
impl std::fmt::Display for QuadratureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::Converged => "converged",
            Self::SubdivisionLimit => "maximum number of subdivisions reached",
            Self::RoundoffDetected => "roundoff error prevents the requested tolerance",
            Self::BadIntegrand => "extremely bad integrand behavior in the interval",
        };
        write!(f, "{msg}")
    }
}

/// The outcome of [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Integral {
    /// The estimated definite integral.
    pub value: f64,

    /// Estimated upper bound on `|value - exact|`. Never negative.
    pub abs_error: f64,

    /// Number of integrand evaluations.
    pub evaluations: usize,

    /// Number of subintervals in the final partition.
    pub subintervals: usize,

    /// Why integration stopped.
    pub status: QuadratureStatus,
}

/// One application of the 21-point Gauss-Kronrod rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleEstimate {
    /// The 21-point Kronrod estimate of the integral.
    pub value: f64,

    /// Estimated absolute error.
    pub abs_error: f64,

    /// Estimate of `∫|f|`.
    pub resabs: f64,

    /// Estimate of `∫|f - mean(f)|`, a measure of how much the integrand varies.
    pub resasc: f64,
}

/// Applies the 10-point Gauss / 21-point Kronrod pair to `f` over `[a, b]`.
///
/// The error estimate is the QUADPACK heuristic: the Gauss-Kronrod difference is scaled by
/// `resasc·min(1, (200·|K - G| / resasc)^1.5)`, then floored at `50·ε·resabs`.
///
/// Exact for polynomials up to degree 31.
pub fn gauss_kronrod_21(f: impl Fn(f64) -> f64, a: f64, b: f64) -> RuleEstimate {
    let centr = 0.5 * (a + b);
    let hlgth = 0.5 * (b - a);
    let dhlgth = hlgth.abs();

    let mut fv1 = [0.0; 10];
    let mut fv2 = [0.0; 10];

    let fc = f(centr);
    let mut resg = 0.0;
    let mut resk = WGK[10] * fc;
    let mut resabs = resk.abs();

    for (j, (x, w)) in XGK[..10].iter().zip(&WGK[..10]).enumerate() {
        let absc = hlgth * x;
        let fval1 = f(centr - absc);
        let fval2 = f(centr + absc);
        fv1[j] = fval1;
        fv2[j] = fval2;

        let fsum = fval1 + fval2;
        if j % 2 == 1 {
            resg += WG[j / 2] * fsum;
        }
        resk += w * fsum;
        resabs += w * (fval1.abs() + fval2.abs());
    }

    let reskh = resk * 0.5;
    let mut resasc = WGK[10] * (fc - reskh).abs();
    for j in 0..10 {
        resasc += WGK[j] * ((fv1[j] - reskh).abs() + (fv2[j] - reskh).abs());
    }

    let value = resk * hlgth;
    resabs *= dhlgth;
    resasc *= dhlgth;

    let mut abs_error = ((resk - resg) * hlgth).abs();
    if resasc != 0.0 && abs_error != 0.0 {
        abs_error = resasc * (200.0 * abs_error / resasc).powf(1.5).min(1.0);
    }
    if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        abs_error = abs_error.max(50.0 * f64::EPSILON * resabs);
    }

    RuleEstimate {
        value,
        abs_error,
        resabs,
        resasc,
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    area: f64,
    error: f64,
}

/// Integrates `f` over `[a, b]` by globally adaptive Gauss-Kronrod quadrature.
///
/// - `a == b` gives zero with zero error.
/// - `a > b` gives the negated integral over `[b, a]`.
///
/// Results that stop short of the tolerance keep their status and are logged as a warning.
///
/// # Errors
/// - [`Error::InvalidBounds`] if either bound is not finite.
/// - [`Error::InvalidConfig`] if the options are unusable; see [`QuadratureOptions::validate`].
#[allow(clippy::float_cmp)]
pub fn integrate(
    f: impl Fn(f64) -> f64,
    a: f64,
    b: f64,
    options: &QuadratureOptions,
) -> Result<Integral> {
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::InvalidBounds(a.to_string(), b.to_string()));
    }
    options.validate()?;

    if a == b {
        return Ok(Integral {
            value: 0.0,
            abs_error: 0.0,
            evaluations: 0,
            subintervals: 0,
            status: QuadratureStatus::Converged,
        });
    }

    let integral = if a > b {
        let forward = adaptive(&f, b, a, options);
        Integral {
            value: -forward.value,
            ..forward
        }
    } else {
        adaptive(&f, a, b, options)
    };

    if !integral.status.is_converged() {
        log::warn!(
            "integral over {a}..{b} did not converge: {} (error estimate {:e})",
            integral.status,
            integral.abs_error
        );
    }

    Ok(integral)
}

/// The `QAG` driver, for `a < b`.
#[allow(clippy::float_cmp)]
fn adaptive(f: &impl Fn(f64) -> f64, a: f64, b: f64, options: &QuadratureOptions) -> Integral {
    let QuadratureOptions {
        epsabs,
        epsrel,
        limit,
    } = *options;
    let epmach = f64::EPSILON;
    let uflow = f64::MIN_POSITIVE;

    let first = gauss_kronrod_21(f, a, b);
    let mut evaluations = RULE_EVALUATIONS;

    let finish = |segments: &[Segment], errsum: f64, evaluations: usize, status| Integral {
        value: segments.iter().map(|s| s.area).sum(),
        abs_error: errsum,
        evaluations,
        subintervals: segments.len(),
        status,
    };

    let mut segments = vec![Segment {
        a,
        b,
        area: first.value,
        error: first.abs_error,
    }];

    let errbnd = epsabs.max(epsrel * first.value.abs());
    if first.abs_error <= 50.0 * epmach * first.resabs && first.abs_error > errbnd {
        return finish(&segments, first.abs_error, evaluations, QuadratureStatus::RoundoffDetected);
    }
    if limit == 1 && first.abs_error > errbnd {
        return finish(&segments, first.abs_error, evaluations, QuadratureStatus::SubdivisionLimit);
    }
    if (first.abs_error <= errbnd && first.abs_error != first.resasc) || first.abs_error == 0.0 {
        return finish(&segments, first.abs_error, evaluations, QuadratureStatus::Converged);
    }

    let mut area = first.value;
    let mut errsum = first.abs_error;
    let mut iroff1 = 0;
    let mut iroff2 = 0;
    let mut status = QuadratureStatus::Converged;

    while segments.len() < limit {
        let Some((maxerr, &worst)) = segments
            .iter()
            .enumerate()
            .max_by(|(_, l), (_, r)| l.error.total_cmp(&r.error))
        else {
            break;
        };

        // Bisect the interval with the largest error estimate
        let (a1, b2) = (worst.a, worst.b);
        let b1 = 0.5 * (a1 + b2);
        let a2 = b1;
        let left = gauss_kronrod_21(f, a1, b1);
        let right = gauss_kronrod_21(f, a2, b2);
        evaluations += 2 * RULE_EVALUATIONS;

        let area12 = left.value + right.value;
        let erro12 = left.abs_error + right.abs_error;
        errsum += erro12 - worst.error;
        area += area12 - worst.area;

        let last = segments.len() + 1;
        if left.resasc != left.abs_error && right.resasc != right.abs_error {
            if (worst.area - area12).abs() <= 1e-5 * area12.abs() && erro12 >= 0.99 * worst.error {
                iroff1 += 1;
            }
            if last > 10 && erro12 > worst.error {
                iroff2 += 1;
            }
        }

        segments[maxerr] = Segment {
            a: a1,
            b: b1,
            area: left.value,
            error: left.abs_error,
        };
        segments.push(Segment {
            a: a2,
            b: b2,
            area: right.value,
            error: right.abs_error,
        });

        let errbnd = epsabs.max(epsrel * area.abs());
        if errsum <= errbnd {
            break;
        }

        if iroff1 >= 6 || iroff2 >= 20 {
            status = QuadratureStatus::RoundoffDetected;
        }
        if last == limit {
            status = QuadratureStatus::SubdivisionLimit;
        }
        if a1.abs().max(b2.abs()) <= (1.0 + 100.0 * epmach) * (a2.abs() + 1000.0 * uflow) {
            status = QuadratureStatus::BadIntegrand;
        }
        if status != QuadratureStatus::Converged {
            break;
        }
    }

    finish(&segments, errsum, evaluations, status)
}
