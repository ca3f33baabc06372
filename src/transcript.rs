//! Non-interactive and simulation transcripts, and their wire encoding.
//!
//! ```text
//! transcript    := "SCNI" ‖ version(1) ‖ challenge(16) ‖ response ‖ precommitment ‖ hash(32)
//! response      := 0x00 ‖ u32 n ‖ n·scalar
//!                | 0x01 ‖ u32 n ‖ n·response
//!                | 0x02 ‖ u32 n ‖ n·challenge(16) ‖ n·response
//! precommitment := 0x00
//!                | 0x01 ‖ u32 n ‖ n·precommitment
//!                | 0x02 ‖ u32 m ‖ m·element ‖ precommitment
//! ```
//!
//! Integers, challenges and scalars are big-endian; elements use their
//! canonical group encoding.

use ff::PrimeField;
use group::prime::PrimeGroup;

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::composition::{Commitment, Response};
use crate::errors::Error;
use crate::extended::Precommitment;
use crate::group::serialization::{
    element_len, read_elements, read_len, read_scalar, read_u8, scalar_len, serialize_elements,
    take, write_len, write_scalar,
};
use crate::proof_id::StatementHash;

const MAGIC: &[u8; 4] = b"SCNI";
const VERSION: u8 = 1;

/// Nesting limit when decoding; statement trees are far shallower.
const MAX_DEPTH: usize = 64;

/// A non-interactive proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NITranscript<G: PrimeGroup> {
    pub challenge: Challenge,
    pub responses: Response<G::Scalar>,
    pub precommitment: Precommitment<G>,
    pub statement_hash: StatementHash,
}

/// A simulated transcript: a non-interactive transcript plus its commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationTranscript<G: PrimeGroup> {
    pub commitment: Commitment<G>,
    pub challenge: Challenge,
    pub responses: Response<G::Scalar>,
    pub precommitment: Precommitment<G>,
    pub statement_hash: StatementHash,
}

impl<G: PrimeGroup> From<SimulationTranscript<G>> for NITranscript<G> {
    fn from(simulation: SimulationTranscript<G>) -> Self {
        Self {
            challenge: simulation.challenge,
            responses: simulation.responses,
            precommitment: simulation.precommitment,
            statement_hash: simulation.statement_hash,
        }
    }
}

impl<G: PrimeGroup> NITranscript<G> {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&self.challenge.to_bytes());
        write_response(&mut out, &self.responses);
        write_precommitment(&mut out, &self.precommitment);
        out.extend_from_slice(&self.statement_hash);
        out
    }

    /// Decodes a transcript written by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    /// [`Error::Deserialization`] for malformed input, [`Error::GroupMismatch`]
    /// for an element that does not decode in `G`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut cursor = data;
        if take(&mut cursor, MAGIC.len())? != MAGIC {
            return Err(Error::Deserialization("not a transcript".into()));
        }
        let version = read_u8(&mut cursor)?;
        if version != VERSION {
            return Err(Error::Deserialization(format!(
                "unsupported transcript version {version}"
            )));
        }
        let challenge = read_challenge(&mut cursor)?;
        let responses = read_response::<G::Scalar>(&mut cursor, 0)?;
        let precommitment = read_precommitment::<G>(&mut cursor, 0)?;
        let mut statement_hash = [0u8; 32];
        statement_hash.copy_from_slice(take(&mut cursor, 32)?);
        if !cursor.is_empty() {
            return Err(Error::Deserialization("trailing bytes".into()));
        }
        Ok(Self {
            challenge,
            responses,
            precommitment,
            statement_hash,
        })
    }
}

const RESPONSE_SIMPLE: u8 = 0x00;
const RESPONSE_AND: u8 = 0x01;
const RESPONSE_OR: u8 = 0x02;

const PRECOMMITMENT_EMPTY: u8 = 0x00;
const PRECOMMITMENT_COMPOSITE: u8 = 0x01;
const PRECOMMITMENT_EXTENDED: u8 = 0x02;

fn write_response<F: PrimeField>(out: &mut Vec<u8>, response: &Response<F>) {
    match response {
        Response::Simple(scalars) => {
            out.push(RESPONSE_SIMPLE);
            write_len(out, scalars.len());
            scalars.iter().for_each(|scalar| write_scalar(out, scalar));
        }
        Response::And(children) => {
            out.push(RESPONSE_AND);
            write_len(out, children.len());
            children.iter().for_each(|child| write_response(out, child));
        }
        Response::Or(challenges, children) => {
            out.push(RESPONSE_OR);
            write_len(out, children.len());
            challenges
                .iter()
                .for_each(|challenge| out.extend_from_slice(&challenge.to_bytes()));
            children.iter().for_each(|child| write_response(out, child));
        }
    }
}

fn write_precommitment<G: PrimeGroup>(out: &mut Vec<u8>, precommitment: &Precommitment<G>) {
    match precommitment {
        Precommitment::Empty => out.push(PRECOMMITMENT_EMPTY),
        Precommitment::Composite(children) => {
            out.push(PRECOMMITMENT_COMPOSITE);
            write_len(out, children.len());
            children.iter().for_each(|child| write_precommitment(out, child));
        }
        Precommitment::Extended { elements, inner } => {
            out.push(PRECOMMITMENT_EXTENDED);
            write_len(out, elements.len());
            out.extend_from_slice(&serialize_elements(elements));
            write_precommitment(out, inner);
        }
    }
}

fn read_challenge(data: &mut &[u8]) -> Result<Challenge, Error> {
    let mut bytes = [0u8; CHALLENGE_BYTES];
    bytes.copy_from_slice(take(data, CHALLENGE_BYTES)?);
    Ok(Challenge::from_bytes(bytes))
}

fn check_depth(depth: usize) -> Result<(), Error> {
    if depth > MAX_DEPTH {
        return Err(Error::Deserialization("nesting too deep".into()));
    }
    Ok(())
}

fn read_response<F: PrimeField>(data: &mut &[u8], depth: usize) -> Result<Response<F>, Error> {
    check_depth(depth)?;
    match read_u8(data)? {
        RESPONSE_SIMPLE => {
            let count = read_len(data, scalar_len::<F>())?;
            (0..count)
                .map(|_| read_scalar(data))
                .collect::<Result<_, _>>()
                .map(Response::Simple)
        }
        RESPONSE_AND => {
            let count = read_len(data, 1)?;
            (0..count)
                .map(|_| read_response(data, depth + 1))
                .collect::<Result<_, _>>()
                .map(Response::And)
        }
        RESPONSE_OR => {
            let count = read_len(data, CHALLENGE_BYTES + 1)?;
            let challenges = (0..count)
                .map(|_| read_challenge(data))
                .collect::<Result<Vec<_>, _>>()?;
            let children = (0..count)
                .map(|_| read_response(data, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Response::Or(challenges, children))
        }
        tag => Err(Error::Deserialization(format!("unknown response tag {tag}"))),
    }
}

fn read_precommitment<G: PrimeGroup>(
    data: &mut &[u8],
    depth: usize,
) -> Result<Precommitment<G>, Error> {
    check_depth(depth)?;
    match read_u8(data)? {
        PRECOMMITMENT_EMPTY => Ok(Precommitment::Empty),
        PRECOMMITMENT_COMPOSITE => {
            let count = read_len(data, 1)?;
            (0..count)
                .map(|_| read_precommitment(data, depth + 1))
                .collect::<Result<_, _>>()
                .map(Precommitment::Composite)
        }
        PRECOMMITMENT_EXTENDED => {
            let count = read_len(data, element_len::<G>())?;
            let elements = read_elements(data, count)?;
            let inner = read_precommitment(data, depth + 1)?;
            Ok(Precommitment::Extended {
                elements,
                inner: Box::new(inner),
            })
        }
        tag => Err(Error::Deserialization(format!(
            "unknown precommitment tag {tag}"
        ))),
    }
}
