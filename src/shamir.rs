// Here's the recovery half of Shamir's K-of-N secret sharing, done over
// the integers rather than over a field: all the arithmetic happens in
// exact rationals, and only the final result must come out whole.

use num::bigint::BigInt;
use num::traits::{NumRef, Zero};
use std::cmp::Reverse;
use std::convert::TryFrom;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DecodeError, Error, ReconstructionError, Result};
use crate::math::Rational;
use crate::radix;

// A Share is one of the N split shares of a secret, as it was written
// down: its index, and its y value encoded in some base.  The base is
// kept as given; it only has to make sense once we decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub index: u32,
    pub base: i64,
    pub value: String,
}

// A Point is a decoded share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: BigInt,
}

impl Share {
    pub fn new(index: u32, base: i64, value: impl Into<String>) -> Self {
        Share {
            index,
            base,
            value: value.into(),
        }
    }

    pub fn decode(&self) -> std::result::Result<Point, DecodeError> {
        let base = u32::try_from(self.base).map_err(|_| DecodeError::UnsupportedBase(self.base))?;
        Ok(Point {
            x: self.index,
            y: radix::decode(&self.value, base)?,
        })
    }
}

impl Point {
    pub fn new(x: u32, y: impl Into<BigInt>) -> Self {
        Point { x, y: y.into() }
    }
}

// Which K points to use when more than K are available: the ones with
// the smallest x, or the ones with the largest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Lowest,
    Highest,
}

impl FromStr for Selection {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "lowest" => Ok(Selection::Lowest),
            "highest" => Ok(Selection::Highest),
            other => Err(format!("unknown selection {:?} (expected lowest or highest)", other)),
        }
    }
}

// A parambuilder is used to configure how a secret gets recovered.
pub struct ParamBuilder {
    p: Params,
}

// A Params structure encodes the K, which K points to use, and whether
// to check the leftover points against the result.
#[derive(Clone, Debug)]
pub struct Params {
    k: usize,
    selection: Selection,
    verify_surplus: bool,
}

impl ParamBuilder {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::ZeroThreshold);
        }
        Ok(ParamBuilder {
            p: Params {
                k,
                selection: Selection::default(),
                verify_surplus: false,
            },
        })
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.p.selection = selection;
        self
    }

    // Check every point we don't use against the recovered polynomial.
    //
    // Off by default: any K consistent points give the same answer, and
    // nothing forces the surplus ones to be consistent.
    pub fn verify_surplus(mut self, verify: bool) -> Self {
        self.p.verify_surplus = verify;
        self
    }

    pub fn finalize(self) -> Params {
        self.p
    }
}

// Evaluate at `at` the unique polynomial of degree < points.len()
// passing through the given (x, y) pairs.
//
// The x coordinates must be distinct.  Over an exact type such as
// Rational the result is exact too.
pub fn interpolate_at<N>(points: &[(N, N)], at: &N) -> N
where
    N: NumRef + Clone,
{
    let mut accumulator = N::zero();
    for (i, (xi, yi)) in points.iter().enumerate() {
        let mut numerator = N::one();
        let mut denominator = N::one();
        for (j, (xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }

            numerator = numerator * (at.clone() - xj);
            denominator = denominator * (xi.clone() - xj);
        }
        accumulator = accumulator + (numerator * yi) / denominator;
    }
    accumulator
}

impl Params {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    // Split `points` into the K we will use, sorted by x, and the rest.
    //
    // Sorting is stable, so among points with equal x the earlier ones win.
    pub fn select<'a>(&self, points: &'a [Point]) -> Result<(Vec<&'a Point>, Vec<&'a Point>)> {
        if points.len() < self.k {
            return Err(Error::InsufficientShares {
                have: points.len(),
                need: self.k,
            });
        }
        let mut selected: Vec<&Point> = points.iter().collect();
        match self.selection {
            Selection::Lowest => selected.sort_by_key(|p| p.x),
            Selection::Highest => selected.sort_by_key(|p| Reverse(p.x)),
        }
        let surplus = selected.split_off(self.k);
        selected.sort_by_key(|p| p.x);
        Ok((selected, surplus))
    }

    // Reconstruct the secret from K of the given points.
    pub fn reconstruct(&self, points: &[Point]) -> Result<BigInt> {
        let (selected, surplus) = self.select(points)?;
        if let Some(pair) = selected.windows(2).find(|w| w[0].x == w[1].x) {
            return Err(ReconstructionError::DuplicateX(pair[0].x).into());
        }
        debug!(
            k = self.k,
            xs = ?selected.iter().map(|p| p.x).collect::<Vec<_>>(),
            "interpolating"
        );

        let known: Vec<(Rational, Rational)> = selected
            .iter()
            .map(|p| (Rational::from(p.x), Rational::from(p.y.clone())))
            .collect();
        let value = interpolate_at(&known, &Rational::zero());
        let secret = match value.to_integer() {
            Some(secret) => secret,
            None => return Err(ReconstructionError::NonIntegral(value).into()),
        };

        if self.verify_surplus {
            for p in surplus {
                let predicted = interpolate_at(&known, &Rational::from(p.x));
                if predicted != Rational::from(p.y.clone()) {
                    return Err(ReconstructionError::InconsistentShare { x: p.x }.into());
                }
            }
        }
        Ok(secret)
    }
}

// Reconstruct a secret from the K points with the smallest x.
pub fn reconstruct(points: &[Point], k: usize) -> Result<BigInt> {
    ParamBuilder::new(k)?.finalize().reconstruct(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::traits::Pow;
    use quickcheck::{quickcheck, TestResult};

    // Helper: Given a polynomial's coefficients (from highest-order term
    // down to the 0th-order term), evaluate that polynomial at x.
    fn evaluate_poly_at<N>(poly: &[N], x: &N) -> N
    where
        N: NumRef,
    {
        poly.iter().fold(N::zero(), |acc: N, t: &N| acc * x + t)
    }

    fn points(pairs: &[(u32, i64)]) -> Vec<Point> {
        pairs.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn demo() {
        let pts = points(&[(1, 4), (2, 7), (3, 12)]);
        assert_eq!(reconstruct(&pts, 3).unwrap(), BigInt::from(3));
    }

    #[test]
    fn decoded_shares() {
        let shares = [Share::new(1, 10, "4"), Share::new(2, 2, "111")];
        let pts: Vec<Point> = shares.iter().map(|s| s.decode().unwrap()).collect();
        assert_eq!(pts[1], Point::new(2, 7));
        assert_eq!(reconstruct(&pts, 2).unwrap(), BigInt::from(1));
    }

    #[test]
    fn single_share() {
        let pts = points(&[(9, -42)]);
        assert_eq!(reconstruct(&pts, 1).unwrap(), BigInt::from(-42));
    }

    #[test]
    fn order_does_not_matter() {
        let pts = points(&[(3, 12), (1, 4), (2, 7)]);
        assert_eq!(reconstruct(&pts, 3).unwrap(), BigInt::from(3));
    }

    #[test]
    fn uses_lowest_k() {
        // The bogus share at x = 10 is never looked at.
        let pts = points(&[(10, 999), (3, 12), (1, 4), (2, 7)]);
        assert_eq!(reconstruct(&pts, 3).unwrap(), BigInt::from(3));
    }

    #[test]
    fn uses_highest_k() {
        let pts = points(&[(1, 999), (2, 7), (3, 12), (4, 19)]);
        let params = ParamBuilder::new(3)
            .unwrap()
            .selection(Selection::Highest)
            .finalize();
        assert_eq!(params.reconstruct(&pts).unwrap(), BigInt::from(3));
        let (selected, surplus) = params.select(&pts).unwrap();
        assert_eq!(
            selected.iter().map(|p| p.x).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert_eq!(surplus[0].x, 1);
    }

    #[test]
    fn duplicate_x() {
        let pts = points(&[(1, 4), (1, 5), (2, 7)]);
        match reconstruct(&pts, 2) {
            Err(Error::Reconstruction(ReconstructionError::DuplicateX(1))) => {}
            other => panic!("unexpected {:?}", other),
        }
        // A duplicate outside the selected K is harmless.
        let pts = points(&[(1, 4), (2, 7), (3, 12), (3, 13)]);
        assert_eq!(reconstruct(&pts, 3).unwrap(), BigInt::from(3));
    }

    #[test]
    fn insufficient() {
        let pts = points(&[(1, 4), (2, 7)]);
        match reconstruct(&pts, 3) {
            Err(Error::InsufficientShares { have: 2, need: 3 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn zero_threshold() {
        assert!(matches!(reconstruct(&[], 0), Err(Error::ZeroThreshold)));
    }

    #[test]
    fn non_integral() {
        // The line through these crosses x = 0 at -1/2.
        let pts = points(&[(1, 0), (3, 1)]);
        match reconstruct(&pts, 2) {
            Err(Error::Reconstruction(ReconstructionError::NonIntegral(v))) => {
                assert_eq!(v.to_string(), "-1/2");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn surplus_verification() {
        let params = ParamBuilder::new(2).unwrap().verify_surplus(true).finalize();
        let good = points(&[(1, 4), (2, 7), (5, 16)]);
        assert_eq!(params.reconstruct(&good).unwrap(), BigInt::from(1));

        let bad = points(&[(1, 4), (2, 7), (5, 17)]);
        match params.reconstruct(&bad) {
            Err(Error::Reconstruction(ReconstructionError::InconsistentShare { x: 5 })) => {}
            other => panic!("unexpected {:?}", other),
        }

        // Without verification the bad share goes unnoticed.
        assert_eq!(reconstruct(&bad, 2).unwrap(), BigInt::from(1));
    }

    #[test]
    fn interpolate_elsewhere() {
        let known: Vec<(Rational, Rational)> = [(1i64, 4i64), (2, 7), (3, 12)]
            .iter()
            .map(|&(x, y)| (Rational::from(x), Rational::from(y)))
            .collect();
        assert_eq!(interpolate_at(&known, &Rational::from(10i64)), Rational::from(103i64));
    }

    #[test]
    fn huge_values() {
        // P(x) = 7^120 x^2 - 3^200 x + 2^300
        let a = BigInt::from(7).pow(120u32);
        let b = -BigInt::from(3).pow(200u32);
        let c = BigInt::from(2).pow(300u32);
        let poly = vec![a, b, c.clone()];
        let pts: Vec<Point> = [4u32, 11, 17, 30]
            .iter()
            .map(|&x| Point::new(x, evaluate_poly_at(&poly, &BigInt::from(x))))
            .collect();
        assert_eq!(reconstruct(&pts, 3).unwrap(), c);
    }

    quickcheck! {
        fn p_recovers_constant_term(coeffs : Vec<i32>, xs : Vec<u16>) -> TestResult {
            let coeffs : Vec<BigInt> =
                coeffs.into_iter().take(8).map(BigInt::from).collect();
            let mut xs : Vec<u32> = xs.into_iter().map(u32::from).collect();
            xs.sort();
            xs.dedup();
            if coeffs.is_empty() || xs.len() < coeffs.len() {
                return TestResult::discard();
            }
            let pts : Vec<Point> = xs
                .iter()
                .map(|&x| Point::new(x, evaluate_poly_at(&coeffs, &BigInt::from(x))))
                .collect();
            let secret = reconstruct(&pts, coeffs.len()).unwrap();
            TestResult::from_bool(&secret == coeffs.last().unwrap())
        }
    }
}
