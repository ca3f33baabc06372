//! Ready-made [`ExtendedStatement`](crate::ExtendedStatement)s.
//!
//! - [`DLNotEqual`]: `log_{g0} Y0 ≠ log_{g1} Y1`,
//! - [`BbsPlusSignatureStmt`]: knowledge of a BBS+ signature on committed messages,
//! - [`PowerTwoRangeStmt`] and [`RangeStmt`]: the value of a Pedersen
//!   commitment lies in `[0, 2ⁿ)` or in `[lower, upper)`.

pub mod bbsplus;
pub mod dl_notequal;
pub mod range;

pub use bbsplus::{BbsPlusSignatureStmt, KeyPair, Signature, SignatureParams};
pub use dl_notequal::DLNotEqual;
pub use range::{PowerTwoRangeStmt, RangeStmt};
