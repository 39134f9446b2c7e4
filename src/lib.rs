//! Recovery of secrets split with (k, n) threshold sharing, by exact
//! Lagrange interpolation over the integers.
//!
//! Share values arrive as numerals in arbitrary bases; they are decoded to
//! big integers, and the interpolation runs over exact rationals so nothing
//! is ever rounded away.

mod error;
mod math;
pub mod radix;
pub mod shamir;

pub mod data;

pub use error::{DecodeError, Error, ReconstructionError, Result};
pub use math::{ParseRationalError, Rational};
pub use radix::decode;
pub use shamir::{reconstruct, Point, Selection, Share};
