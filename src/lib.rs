// src/lib.rs

//! # Jacobi Elliptic Functions
//!
//! Evaluation of sn(u|m), cn(u|m) and dn(u|m) for real and complex
//! argument u with the elliptic parameter m in [0, 1], covering both
//! degenerate edges (trigonometric at m = 0, hyperbolic at m = 1) and
//! the AGM regime in between.

// Scalar kernels: regime dispatch, complex extension, fixed-m cache
pub mod sncndn;

// Array entry points with the scalar/elementwise/outer broadcast rules
pub mod ellipj;
