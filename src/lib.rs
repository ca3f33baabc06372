//! # sigma-compose
//!
//! Composable Sigma protocols proving knowledge of discrete-log
//! representations over prime-order groups.
//!
//! A proof statement is a tree:
//! - [`DLRep`] leaves claim knowledge of secrets `xᵢ` with `Y = Σ xᵢ·Gᵢ`,
//! - `And` and `Or` nodes combine statements (written `a & b` and `a | b`),
//! - [`Extended`] nodes hold statements that expand into a sub-tree once the
//!   prover publishes a precommitment (see [`primitives`]).
//!
//! Every statement runs interactively ([`Statement::get_prover`],
//! [`Statement::get_verifier`]) or non-interactively through Fiat-Shamir
//! ([`Statement::prove`], [`Statement::verify`], [`Nizk`]).
//!
//! ```
//! use curve25519_dalek::{RistrettoPoint, Scalar};
//! use ff::Field;
//! use group::Group;
//! use sigma_compose::{Secret, SecretValues, Statement};
//!
//! let mut rng = rand::thread_rng();
//! let (g, h) = (RistrettoPoint::random(&mut rng), RistrettoPoint::random(&mut rng));
//! let (x, r) = (Scalar::random(&mut rng), Scalar::random(&mut rng));
//! let (sx, sr) = (Secret::named("x"), Secret::named("r"));
//!
//! let statement = Statement::dlrep(g * x + h * r, &sx * g + &sr * h).unwrap();
//! let values = SecretValues::from([(sx, x), (sr, r)]);
//! let proof = statement.prove(&values, b"message", &mut rng).unwrap();
//! assert!(statement.verify(&proof, b"message").unwrap());
//! ```

pub mod challenge;
pub mod codec;
pub mod composition;
pub mod dlrep;
pub mod duplex_sponge;
pub mod errors;
pub mod expression;
pub mod extended;
pub mod fiat_shamir;
pub mod group;
pub mod interactive;
pub mod primitives;
pub mod proof_id;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use challenge::{Challenge, CHALLENGE_BITS};
pub use codec::{ByteChallengeCodec, Codec, ShakeCodec};
pub use composition::{Commitment, Response, Statement, StatementKind};
pub use dlrep::DLRep;
pub use errors::Error;
pub use expression::{Expression, Secret, SecretValues, Term};
pub use extended::{Extended, ExtendedStatement, Precommitment, Precommitted};
pub use fiat_shamir::{Nizk, DEFAULT_SESSION_ID};
pub use interactive::{Prover, Verifier};
pub use proof_id::{ProofId, StatementHash};
pub use transcript::{NITranscript, SimulationTranscript};
