// Implements exact rational numbers over arbitrary-precision integers.
//
// Every value is kept normalized: the denominator is strictly positive,
// and shares no common factor with the numerator.  That makes equality
// structural, and keeps the operands small when we combine many terms.
//
// Division by zero panics, the same way it does for BigInt.

use num::bigint::{BigInt, ParseBigIntError, Sign};
use num::traits::{Num, One, Signed, Zero};
use num::Integer;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::ops::{AddAssign, DivAssign, MulAssign, RemAssign, SubAssign};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    // Invariant: den > 0 and gcd(num, den) == 1.  (Zero is 0/1.)
    num : BigInt,
    den : BigInt,
}

impl Rational {
    // Construct num / den, reduced to lowest terms.  None if den is zero.
    pub fn new(num : BigInt, den : BigInt) -> Option<Self> {
        if den.is_zero() {
            None
        } else {
            Some(Rational::reduce(num, den))
        }
    }

    // Internal use only: requires that den is nonzero.
    fn reduce(num : BigInt, den : BigInt) -> Self {
        debug_assert!(!den.is_zero());
        let g = num.gcd(&den);
        // gcd is never negative, and is only zero when both inputs are.
        let (mut num, mut den) = if g.is_one() {
            (num, den)
        } else {
            (num / &g, den / &g)
        };
        if den.sign() == Sign::Minus {
            num = -num;
            den = -den;
        }
        Rational { num, den }
    }

    pub fn from_integer(v : BigInt) -> Self {
        Rational { num : v, den : BigInt::one() }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    // Return this value as an integer, if it is one.  Never rounds.
    pub fn to_integer(&self) -> Option<BigInt> {
        if self.is_integer() {
            Some(self.num.clone())
        } else {
            None
        }
    }

    // Compute the reciprocal of this value.
    pub fn recip(&self) -> Self {
        if self.num.is_zero() {
            panic!("attempt to divide by zero");
        }
        // Swapping keeps gcd == 1; only the sign may need fixing.
        if self.num.is_negative() {
            Rational { num : -&self.den, den : -&self.num }
        } else {
            Rational { num : self.den.clone(), den : self.num.clone() }
        }
    }
}

impl From<BigInt> for Rational {
    fn from(v : BigInt) -> Rational {
        Rational::from_integer(v)
    }
}
impl From<i64> for Rational {
    fn from(v : i64) -> Rational {
        Rational::from_integer(BigInt::from(v))
    }
}
impl From<u32> for Rational {
    fn from(v : u32) -> Rational {
        Rational::from_integer(BigInt::from(v))
    }
}

impl Zero for Rational {
    fn zero() -> Rational {
        Rational::from_integer(BigInt::zero())
    }
    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}
impl One for Rational {
    fn one() -> Rational {
        Rational::from_integer(BigInt::one())
    }
}

impl Display for Rational {
    fn fmt(&self, f : &mut Formatter) -> Result<(), fmt::Error> {
        if self.is_integer() {
            Display::fmt(&self.num, f)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

// The arithmetic itself.  All of it is written against borrowed
// operands; the owned forms below forward here.

impl<'a> Add<&'a Rational> for Rational {
    type Output = Self;
    fn add(self, rhs : &Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::reduce(self.num + &rhs.num, self.den);
        }
        let num = self.num * &rhs.den + &rhs.num * &self.den;
        Rational::reduce(num, self.den * &rhs.den)
    }
}

impl<'a> Sub<&'a Rational> for Rational {
    type Output = Self;
    fn sub(self, rhs : &Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::reduce(self.num - &rhs.num, self.den);
        }
        let num = self.num * &rhs.den - &rhs.num * &self.den;
        Rational::reduce(num, self.den * &rhs.den)
    }
}

impl<'a> Mul<&'a Rational> for Rational {
    type Output = Self;
    fn mul(self, rhs : &Rational) -> Rational {
        Rational::reduce(self.num * &rhs.num, self.den * &rhs.den)
    }
}

impl<'a> Div<&'a Rational> for Rational {
    type Output = Self;
    fn div(self, rhs : &Rational) -> Rational {
        self * &rhs.recip()
    }
}

impl<'a> Rem<&'a Rational> for Rational {
    type Output = Self;
    // Truncating remainder, with the sign of the dividend, like BigInt.
    // Nothing in the interpolation needs this, but the Num trait does.
    fn rem(self, rhs : &Rational) -> Rational {
        if rhs.num.is_zero() {
            panic!("attempt to calculate the remainder with a divisor of zero");
        }
        // (a/b) % (c/d) == ((a*d) % (c*b)) / (b*d)
        let num = (self.num * &rhs.den) % (&rhs.num * &self.den);
        Rational::reduce(num, self.den * &rhs.den)
    }
}

impl Neg for Rational {
    type Output = Self;
    fn neg(self) -> Self {
        Rational { num : -self.num, den : self.den }
    }
}

impl Add for Rational {
    type Output = Self;
    fn add(self, rhs : Self) -> Self {
        self + &rhs
    }
}
impl Sub for Rational {
    type Output = Self;
    fn sub(self, rhs : Self) -> Self {
        self - &rhs
    }
}
impl Mul for Rational {
    type Output = Self;
    fn mul(self, rhs : Self) -> Self {
        self * &rhs
    }
}
impl Div for Rational {
    type Output = Self;
    fn div(self, rhs : Self) -> Self {
        self / &rhs
    }
}
impl Rem for Rational {
    type Output = Self;
    fn rem(self, rhs : Self) -> Self {
        self % &rhs
    }
}

impl AddAssign for Rational {
    fn add_assign(&mut self, other : Self) {
        *self = std::mem::take(self) + other;
    }
}
impl SubAssign for Rational {
    fn sub_assign(&mut self, other : Self) {
        *self = std::mem::take(self) - other;
    }
}
impl MulAssign for Rational {
    fn mul_assign(&mut self, other : Self) {
        *self = std::mem::take(self) * other;
    }
}
impl DivAssign for Rational {
    fn div_assign(&mut self, other : Self) {
        *self = std::mem::take(self) / other;
    }
}
impl RemAssign for Rational {
    fn rem_assign(&mut self, other : Self) {
        *self = std::mem::take(self) % other;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRationalError {
    Int(ParseBigIntError),
    ZeroDenominator,
}

impl Display for ParseRationalError {
    fn fmt(&self, f : &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            ParseRationalError::Int(e) => Display::fmt(e, f),
            ParseRationalError::ZeroDenominator => f.write_str("zero denominator"),
        }
    }
}

impl std::error::Error for ParseRationalError {}

impl Num for Rational {
    type FromStrRadixErr = ParseRationalError;
    // Accepts "n" or "n/d" with both parts in the given radix.
    fn from_str_radix(s : &str, radix : u32) -> Result<Self, ParseRationalError> {
        let parse = |part : &str| {
            BigInt::from_str_radix(part, radix).map_err(ParseRationalError::Int)
        };
        match s.split_once('/') {
            None => Ok(Rational::from_integer(parse(s)?)),
            Some((n, d)) => Rational::new(parse(n)?, parse(d)?)
                .ok_or(ParseRationalError::ZeroDenominator),
        }
    }
}
