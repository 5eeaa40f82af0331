use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use rstest::rstest;
use std::f64::consts::{FRAC_PI_3, FRAC_PI_8, LN_2};

use elliprs::sncndn::{sncndn, sncndn_complex, SncndnError};

#[rstest]
// m = 0: circular functions, within 10 eps
#[case(FRAC_PI_3, 0.0, 0.8660254037844386, 0.5, 1.0, 2.5e-15)]
#[case(2.0, 0.0, 0.9092974268256817, -0.4161468365471424, 1.0, 2.5e-15)]
// m = 1: hyperbolic functions; sn(ln 2 | 1) = 3/5, cn = dn = 4/5
#[case(LN_2, 1.0, 0.6, 0.8, 0.8, 2.5e-15)]
#[case(-1.3, 1.0, -0.8617231593133063, 0.507378750740602, 0.507378750740602, 2.5e-15)]
// AGM regime, m = tan^4(pi/8)
#[case(-1.0, FRAC_PI_8.tan().powi(4), -0.8392965923, 0.5436738271, 0.9895776106, 1.0e-10)]
// zero argument in the AGM regime
#[case(0.0, 0.5, 0.0, 1.0, 1.0, 1.0e-15)]
fn known_real_values(
    #[case] u: f64,
    #[case] m: f64,
    #[case] sn: f64,
    #[case] cn: f64,
    #[case] dn: f64,
    #[case] tol: f64,
) {
    let r = sncndn(u, m).unwrap();
    assert_abs_diff_eq!(r.sn, sn, epsilon = tol);
    assert_abs_diff_eq!(r.cn, cn, epsilon = tol);
    assert_abs_diff_eq!(r.dn, dn, epsilon = tol);
}

#[rstest]
// pure imaginary argument at m = 0: sn(i ln 2) = 0.75i, cn = 1.25, dn = 1
#[case(
    Complex64::new(0.0, LN_2),
    0.0,
    Complex64::new(0.0, 0.75),
    Complex64::new(1.25, 0.0),
    Complex64::new(1.0, 0.0),
    2.5e-15
)]
// general complex argument in the AGM regime, m = tan^4(pi/8)
#[case(
    Complex64::new(-0.2, 0.4),
    FRAC_PI_8.tan().powi(4),
    Complex64::new(-0.2152524522, 0.402598347),
    Complex64::new(1.059453907, 0.08179712295),
    Complex64::new(1.001705496, 0.00254669712),
    1.0e-9
)]
fn known_complex_values(
    #[case] u: Complex64,
    #[case] m: f64,
    #[case] sn: Complex64,
    #[case] cn: Complex64,
    #[case] dn: Complex64,
    #[case] tol: f64,
) {
    let r = sncndn_complex(u, m).unwrap();
    assert_abs_diff_eq!(r.sn.re, sn.re, epsilon = tol);
    assert_abs_diff_eq!(r.sn.im, sn.im, epsilon = tol);
    assert_abs_diff_eq!(r.cn.re, cn.re, epsilon = tol);
    assert_abs_diff_eq!(r.cn.im, cn.im, epsilon = tol);
    assert_abs_diff_eq!(r.dn.re, dn.re, epsilon = tol);
    assert_abs_diff_eq!(r.dn.im, dn.im, epsilon = tol);
}

#[test]
fn real_identities_hold_across_the_domain() {
    let u_grid = [-5.0, -2.5, -1.0, -0.3, 0.0, 0.7, 1.9, 3.3, 5.0];
    let m_grid = [
        0.0,
        1.0e-12,
        1.0e-9,
        0.25,
        0.5,
        0.75,
        0.9999,
        1.0 - 1.0e-9,
        1.0,
    ];

    for &u in &u_grid {
        for &m in &m_grid {
            let r = sncndn(u, m).unwrap();
            // sn^2 + cn^2 = 1 and dn^2 + m sn^2 = 1
            assert_abs_diff_eq!(r.sn * r.sn + r.cn * r.cn, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(r.dn * r.dn + m * r.sn * r.sn, 1.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn complex_identities_hold_across_the_domain() {
    let re_grid = [-1.5, -0.4, 0.3, 0.8, 2.1];
    let im_grid = [-1.5, -0.4, 0.3, 0.8, 2.1];
    let m_grid = [0.1, 0.5, 0.9];

    let one = Complex64::new(1.0, 0.0);
    for &re in &re_grid {
        for &im in &im_grid {
            for &m in &m_grid {
                let u = Complex64::new(re, im);
                let r = sncndn_complex(u, m).unwrap();
                let pythagorean = r.sn * r.sn + r.cn * r.cn - one;
                let modular = r.dn * r.dn + m * r.sn * r.sn - one;
                assert!(
                    pythagorean.norm() < 5e-12,
                    "sn^2 + cn^2 residual {} at u = {}, m = {}",
                    pythagorean.norm(),
                    u,
                    m
                );
                assert!(
                    modular.norm() < 5e-12,
                    "dn^2 + m sn^2 residual {} at u = {}, m = {}",
                    modular.norm(),
                    u,
                    m
                );
            }
        }
    }
}

#[rstest]
#[case(1.5)]
#[case(-0.25)]
#[case(f64::NAN)]
fn out_of_range_parameter_is_invalid(#[case] m: f64) {
    assert!(matches!(
        sncndn(0.4, m),
        Err(SncndnError::InvalidParameter(_))
    ));
    assert!(matches!(
        sncndn_complex(Complex64::new(0.4, -1.0), m),
        Err(SncndnError::InvalidParameter(_))
    ));
}
