use std::error::Error;
use std::fmt;

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::sncndn::{sncndn, sncndn_complex, Status};

// Custom error type
#[derive(Debug, Clone)]
pub enum EllipjError {
    /// The u and m arrays cannot be paired under any supported broadcast.
    ShapeMismatch(String),
}

impl fmt::Display for EllipjError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EllipjError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
        }
    }
}

impl Error for EllipjError {}

// Result type alias
pub type EllipjResult<T> = Result<T, EllipjError>;

/// Results of a real broadcast evaluation: three value arrays plus the
/// per-element status codes, all of the broadcast shape.
#[derive(Debug, Clone)]
pub struct EllipjReal {
    pub sn: Array2<f64>,
    pub cn: Array2<f64>,
    pub dn: Array2<f64>,
    pub status: Array2<Status>,
}

/// Complex-argument counterpart of [`EllipjReal`].
#[derive(Debug, Clone)]
pub struct EllipjComplex {
    pub sn: Array2<Complex64>,
    pub cn: Array2<Complex64>,
    pub dn: Array2<Complex64>,
    pub status: Array2<Status>,
}

/// How the u and m arrays pair up element by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    /// m is 1×1: every u element against the single m
    ScalarM,
    /// u is 1×1: the single u against every m element
    ScalarU,
    /// u is n×1 and m is 1×k: outer product, result n×k
    Outer,
    /// Identical shapes, elementwise
    Elementwise,
}

/// Resolves the broadcast pairing: scalars are 1×1 arrays, a column of u
/// against a row of m is an outer product, and otherwise the two shapes
/// must match exactly. Anything else is a usage error.
fn resolve_pairing(
    u_dim: (usize, usize),
    m_dim: (usize, usize),
) -> EllipjResult<(Pairing, (usize, usize))> {
    if m_dim == (1, 1) {
        Ok((Pairing::ScalarM, u_dim))
    } else if u_dim == (1, 1) {
        Ok((Pairing::ScalarU, m_dim))
    } else if u_dim.1 == 1 && m_dim.0 == 1 {
        Ok((Pairing::Outer, (u_dim.0, m_dim.1)))
    } else if u_dim == m_dim {
        Ok((Pairing::Elementwise, u_dim))
    } else {
        Err(EllipjError::ShapeMismatch(format!(
            "cannot pair u of shape {}x{} with m of shape {}x{}",
            u_dim.0, u_dim.1, m_dim.0, m_dim.1
        )))
    }
}

/// Expands the resolved pairing into the row-major (u, m) element pairs.
fn broadcast_pairs<T: Copy>(
    u: ArrayView2<T>,
    m: ArrayView2<f64>,
) -> EllipjResult<((usize, usize), Vec<(T, f64)>)> {
    let (pairing, dim) = resolve_pairing(u.dim(), m.dim())?;

    let pairs = match pairing {
        Pairing::ScalarM => {
            let m0 = m[[0, 0]];
            u.iter().map(|&u| (u, m0)).collect()
        }
        Pairing::ScalarU => {
            let u0 = u[[0, 0]];
            m.iter().map(|&m| (u0, m)).collect()
        }
        Pairing::Outer => {
            let mut pairs = Vec::with_capacity(dim.0 * dim.1);
            for i in 0..dim.0 {
                for j in 0..dim.1 {
                    pairs.push((u[[i, 0]], m[[0, j]]));
                }
            }
            pairs
        }
        Pairing::Elementwise => u.iter().copied().zip(m.iter().copied()).collect(),
    };

    Ok((dim, pairs))
}

/// Evaluates sn, cn, dn over every (u, m) pair of the broadcast of two
/// real arrays.
///
/// Accepted pairings (anything else is a [`EllipjError::ShapeMismatch`]):
/// a 1×1 m against any u, a 1×1 u against any m, a column of u against a
/// row of m (outer product), or two arrays of identical shape.
///
/// An element whose m lies outside [0, 1], or whose AGM iteration fails,
/// yields NaN on all three outputs and its status code; the rest of the
/// batch is unaffected.
pub fn ellipj(u: ArrayView2<f64>, m: ArrayView2<f64>) -> EllipjResult<EllipjReal> {
    let (dim, pairs) = broadcast_pairs(u, m)?;

    let elems: Vec<(f64, f64, f64, Status)> = pairs
        .par_iter()
        .map(|&(u, m)| match sncndn(u, m) {
            Ok(jac) => (jac.sn, jac.cn, jac.dn, Status::Ok),
            Err(err) => (f64::NAN, f64::NAN, f64::NAN, Status::from(&err)),
        })
        .collect();

    let cols = dim.1;
    Ok(EllipjReal {
        sn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].0),
        cn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].1),
        dn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].2),
        status: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].3),
    })
}

/// Complex-argument counterpart of [`ellipj`]: same pairings, same
/// per-element degradation, with u complex and m still real.
pub fn ellipj_complex(
    u: ArrayView2<Complex64>,
    m: ArrayView2<f64>,
) -> EllipjResult<EllipjComplex> {
    let (dim, pairs) = broadcast_pairs(u, m)?;
    let nan = Complex64::new(f64::NAN, f64::NAN);

    let elems: Vec<(Complex64, Complex64, Complex64, Status)> = pairs
        .par_iter()
        .map(|&(u, m)| match sncndn_complex(u, m) {
            Ok(jac) => (jac.sn, jac.cn, jac.dn, Status::Ok),
            Err(err) => (nan, nan, nan, Status::from(&err)),
        })
        .collect();

    let cols = dim.1;
    Ok(EllipjComplex {
        sn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].0),
        cn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].1),
        dn: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].2),
        status: Array2::from_shape_fn(dim, |(i, j)| elems[i * cols + j].3),
    })
}
