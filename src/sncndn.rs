use std::error::Error;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use once_cell::sync::Lazy;
use rayon::prelude::*;

/// Storage for the AGM sequences; the iteration may use indices 1..=N_MAX-1.
const N_MAX: usize = 16;

/// Regime threshold: below sqrt(eps) the AGM step underflows and the small-m
/// series takes over (symmetrically for 1 - m on the other end).
static SQRT_EPS: Lazy<f64> = Lazy::new(|| f64::EPSILON.sqrt());

// Custom error type
#[derive(Debug, Clone)]
pub enum SncndnError {
    /// Parameter m outside [0, 1]; NaN counts as outside.
    InvalidParameter(String),
    /// AGM iteration ran out of steps without meeting tolerance.
    NotConverged(String),
}

impl fmt::Display for SncndnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SncndnError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            SncndnError::NotConverged(msg) => write!(f, "Convergence error: {}", msg),
        }
    }
}

impl Error for SncndnError {}

// Result type alias
pub type SncndnResult<T> = Result<T, SncndnError>;

/// Per-element status code surfaced by the batch entry points.
///
/// The numeric values keep the original convention (0 = normal return,
/// 1 = AGM termination condition not met) and add a distinct code for an
/// out-of-range parameter, so an invalid m is distinguishable from a NaN
/// that merely flowed through from a NaN argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    NotConverged = 1,
    InvalidParameter = 2,
}

impl Status {
    /// Numeric form of the status, matching the original error-output codes.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<&SncndnError> for Status {
    fn from(err: &SncndnError) -> Self {
        match err {
            SncndnError::InvalidParameter(_) => Status::InvalidParameter,
            SncndnError::NotConverged(_) => Status::NotConverged,
        }
    }
}

/// Jacobi elliptic function triple (sn, cn, dn) at a real argument.
///
/// Satisfies sn² + cn² = 1 and dn² + m·sn² = 1 to working precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiElliptic {
    pub sn: f64,
    pub cn: f64,
    pub dn: f64,
}

impl JacobiElliptic {
    pub fn new(sn: f64, cn: f64, dn: f64) -> Self {
        Self { sn, cn, dn }
    }
}

/// Jacobi elliptic function triple at a complex argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiEllipticComplex {
    pub sn: Complex64,
    pub cn: Complex64,
    pub dn: Complex64,
}

impl JacobiEllipticComplex {
    pub fn new(sn: Complex64, cn: Complex64, dn: Complex64) -> Self {
        Self { sn, cn, dn }
    }
}

/// Computes the Jacobi elliptic functions sn(u|m), cn(u|m), dn(u|m) for
/// real argument u and parameter m.
///
/// Dispatches on m: a trigonometric perturbation series for m below
/// sqrt(eps), a hyperbolic one for 1 - m below sqrt(eps), and the
/// descending-AGM recursion of Abramowitz & Stegun §16.4 in between.
///
/// # Arguments
/// * `u` - Argument (unrestricted; a NaN argument yields a NaN triple)
/// * `m` - Elliptic parameter (must satisfy 0 ≤ m ≤ 1)
///
/// # Returns
/// The (sn, cn, dn) triple, or an error when m is out of range or the AGM
/// iteration fails to converge within its fixed number of steps
pub fn sncndn(u: f64, m: f64) -> SncndnResult<JacobiElliptic> {
    if !(0.0..=1.0).contains(&m) {
        return Err(SncndnError::InvalidParameter(format!(
            "parameter m = {} is outside [0, 1]",
            m
        )));
    }

    if m < *SQRT_EPS {
        Ok(small_m_series(u, m))
    } else if 1.0 - m < *SQRT_EPS {
        Ok(near_one_series(u, m))
    } else {
        AgmPlan::build(m).map(|plan| plan.eval(u))
    }
}

/// Computes the Jacobi elliptic functions for complex argument u.
///
/// One real evaluation runs along the imaginary axis with the complementary
/// parameter m1 = 1 - m (the Jacobi imaginary transformation), one along the
/// real axis with m; the two triples combine through the addition theorem.
/// If either internal evaluation fails, the whole call fails.
pub fn sncndn_complex(u: Complex64, m: f64) -> SncndnResult<JacobiEllipticComplex> {
    if !(0.0..=1.0).contains(&m) {
        return Err(SncndnError::InvalidParameter(format!(
            "parameter m = {} is outside [0, 1]",
            m
        )));
    }

    let m1 = 1.0 - m;
    let imag = sncndn(u.im, m1)?;
    let (ss1, cc1, dd1) = (imag.sn, imag.cn, imag.dn);

    if u.re == 0.0 {
        // Pure imaginary argument: the direct imaginary-transformation
        // identities, skipping the addition formula's extra division.
        return Ok(JacobiEllipticComplex {
            sn: Complex64::new(0.0, ss1 / cc1),
            cn: Complex64::new(1.0 / cc1, 0.0),
            dn: Complex64::new(dd1 / cc1, 0.0),
        });
    }

    let real = sncndn(u.re, m)?;
    let (ss, cc, dd) = (real.sn, real.cn, real.dn);
    let ddd = cc1 * cc1 + m * ss * ss * ss1 * ss1;

    Ok(JacobiEllipticComplex {
        sn: Complex64::new(ss * dd1 / ddd, cc * dd * ss1 * cc1 / ddd),
        cn: Complex64::new(cc * cc1 / ddd, -ss * dd * ss1 * dd1 / ddd),
        dn: Complex64::new(dd * cc1 * dd1 / ddd, -m * ss * cc * ss1 / ddd),
    })
}

/// Trigonometric perturbation series for small m (Abramowitz & Stegun §16.13)
fn small_m_series(u: f64, m: f64) -> JacobiElliptic {
    let si_u = u.sin();
    let co_u = u.cos();
    let t = 0.25 * m * (u - si_u * co_u);
    JacobiElliptic {
        sn: si_u - t * co_u,
        cn: co_u + t * si_u,
        dn: 1.0 - 0.5 * m * si_u * si_u,
    }
}

/// Hyperbolic perturbation series for m1 = 1 - m small (Abramowitz & Stegun §16.15)
fn near_one_series(u: f64, m: f64) -> JacobiElliptic {
    let m1 = 1.0 - m;
    let si_u = u.sinh();
    let co_u = u.cosh();
    let ta_u = u.tanh();
    let se_u = 1.0 / co_u;
    JacobiElliptic {
        sn: ta_u + 0.25 * m1 * (si_u * co_u - u) * se_u * se_u,
        cn: se_u - 0.25 * m1 * (si_u * co_u - u) * ta_u * se_u,
        dn: se_u + 0.25 * m1 * (si_u * co_u + u) * ta_u * se_u,
    }
}

/// Converged AGM sequences for a fixed parameter m: the a[n], c[n] levels,
/// the step N at which c[N]/a[N] dropped below eps, and the amplitude scale
/// 2^N·a[N]. Everything u-independent about the general regime lives here.
#[derive(Debug, Clone, Copy)]
struct AgmPlan {
    a: [f64; N_MAX],
    c: [f64; N_MAX],
    steps: usize,
    scale: f64,
}

impl AgmPlan {
    /// AGM ascent (Abramowitz & Stegun §16.4): stops at the first step n with
    /// c[n]/a[n] < eps (strict); running out of steps is the only failure.
    fn build(m: f64) -> SncndnResult<Self> {
        let mut a = [0.0; N_MAX];
        let mut c = [0.0; N_MAX];
        a[0] = 1.0;
        c[0] = m.sqrt();
        let mut b = (1.0 - m).sqrt();

        for n in 1..N_MAX {
            a[n] = (a[n - 1] + b) / 2.0;
            c[n] = (a[n - 1] - b) / 2.0;
            b = (a[n - 1] * b).sqrt();
            if c[n] / a[n] < f64::EPSILON {
                let scale = 2.0_f64.powi(n as i32) * a[n];
                return Ok(Self { a, c, steps: n, scale });
            }
        }

        Err(SncndnError::NotConverged(format!(
            "AGM iteration did not converge within {} steps for m = {}",
            N_MAX - 1,
            m
        )))
    }

    /// Amplitude descent: seed phi at the converged level, refine it back
    /// down step by step, and read the triple off the last two phases.
    fn eval(&self, u: f64) -> JacobiElliptic {
        let mut phi = self.scale * u;
        let mut t = 0.0;
        for n in (1..=self.steps).rev() {
            t = phi;
            phi = (((self.c[n] / self.a[n]) * phi.sin()).asin() + phi) / 2.0;
        }
        let sn = phi.sin();
        let cn = phi.cos();
        JacobiElliptic {
            sn,
            cn,
            dn: cn / (t - phi).cos(),
        }
    }
}

/// Computes sn, cn, dn for multiple (u, m) pairs in parallel
pub fn sncndn_parallel(u: &[f64], m: &[f64]) -> Vec<SncndnResult<JacobiElliptic>> {
    assert_eq!(u.len(), m.len());

    u.par_iter()
        .zip(m.par_iter())
        .map(|(&u, &m)| sncndn(u, m))
        .collect()
}

/// Complex-argument counterpart of [`sncndn_parallel`]
pub fn sncndn_complex_parallel(
    u: &[Complex64],
    m: &[f64],
) -> Vec<SncndnResult<JacobiEllipticComplex>> {
    assert_eq!(u.len(), m.len());

    u.par_iter()
        .zip(m.par_iter())
        .map(|(&u, &m)| sncndn_complex(u, m))
        .collect()
}

/// Precomputed evaluator for repeated calls with the same parameter m.
///
/// The AGM ascent depends only on m, so it runs once at construction and
/// evaluation costs only the per-argument amplitude descent; the two series
/// regimes have nothing to precompute and dispatch directly.
pub struct SncndnCache {
    m: f64,
    regime: Regime,
}

enum Regime {
    SmallM,
    NearOne,
    Agm(AgmPlan),
}

impl SncndnCache {
    /// Validates m and precomputes the AGM sequences when the general regime
    /// applies. A parameter that cannot converge surfaces here, not at
    /// evaluation time.
    pub fn new(m: f64) -> SncndnResult<Self> {
        if !(0.0..=1.0).contains(&m) {
            return Err(SncndnError::InvalidParameter(format!(
                "parameter m = {} is outside [0, 1]",
                m
            )));
        }

        let regime = if m < *SQRT_EPS {
            Regime::SmallM
        } else if 1.0 - m < *SQRT_EPS {
            Regime::NearOne
        } else {
            Regime::Agm(AgmPlan::build(m)?)
        };

        Ok(Self { m, regime })
    }

    /// The parameter this cache was built for.
    pub fn parameter(&self) -> f64 {
        self.m
    }

    /// Evaluates (sn, cn, dn) at u; infallible once construction succeeded.
    pub fn eval(&self, u: f64) -> JacobiElliptic {
        match &self.regime {
            Regime::SmallM => small_m_series(u, self.m),
            Regime::NearOne => near_one_series(u, self.m),
            Regime::Agm(plan) => plan.eval(u),
        }
    }
}

/// Batch evaluation against a precomputed cache
pub fn sncndn_batch(cache: Arc<SncndnCache>, u: &[f64]) -> Vec<JacobiElliptic> {
    u.par_iter().map(|&u| cache.eval(u)).collect()
}
