//! Canonical statement identifiers.
//!
//! A [`ProofId`] is a byte string determining a statement tree up to the
//! names of its secrets. It encodes, in pre-order, the kind of each node,
//! the bases and left-hand side of each DLRep, and the parameters (and, once
//! known, the precommitment and constructed statement) of extended
//! statements. Secrets are encoded after the tree as the first-occurrence
//! index of each term's secret, so renaming secrets does not change the
//! identifier while reusing them differently does.
//!
//! ```text
//! id      := lp(SCHEMA) ‖ node ‖ pattern
//! node    := 0x01 ‖ u32 n ‖ n·base ‖ lhs                    DLRep
//!          | 0x02 ‖ u32 n ‖ n·node                          And
//!          | 0x03 ‖ u32 n ‖ n·node                          Or
//!          | 0x04 ‖ lp(name) ‖ u32 m ‖ m·element ‖ lp(label) ‖ tail
//! tail    := 0x00 | 0x01 ‖ u32 k ‖ k·element ‖ node
//! pattern := u32 t ‖ t·u32 index
//! ```
//!
//! Integers are big-endian, `lp` prefixes bytes with their u32 length.

use std::collections::HashMap;

use group::prime::PrimeGroup;
use sha3::{Digest, Sha3_256};

use crate::composition::{Statement, StatementKind};
use crate::group::serialization::{
    serialize_elements, write_element, write_len, write_len_prefixed, write_u32,
};

/// Schema tag of the identifier encoding.
pub const PROOF_ID_SCHEMA: &[u8] = b"sigma-compose/proof-id/v1";

/// SHA3-256 digest of the identifier of a statement before any precommitment.
pub type StatementHash = [u8; 32];

const TAG_DLREP: u8 = 0x01;
const TAG_AND: u8 = 0x02;
const TAG_OR: u8 = 0x03;
const TAG_EXTENDED: u8 = 0x04;

/// Canonical identifier of a statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProofId(Vec<u8>);

impl ProofId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// SHA3-256 of the identifier.
    pub fn digest(&self) -> StatementHash {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Sha3_256::digest(&self.0));
        hash
    }
}

impl AsRef<[u8]> for ProofId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<G: PrimeGroup> Statement<G> {
    /// Identifier of the statement in its current state: once precommitted,
    /// extended statements include their precommitment and constructed statement.
    pub fn proof_id(&self) -> ProofId {
        self.build_id(true)
    }

    /// Hash of the identifier of the outer statement, ignoring precommitments.
    /// Prover and verifier compute it before exchanging anything.
    pub fn statement_hash(&self) -> StatementHash {
        self.build_id(false).digest()
    }

    fn build_id(&self, expanded: bool) -> ProofId {
        let mut out = Vec::new();
        write_len_prefixed(&mut out, PROOF_ID_SCHEMA);
        self.write_node(&mut out, expanded);

        let mut occurrences = Vec::new();
        self.collect_secret_occurrences(expanded, &mut occurrences);
        let mut indices = HashMap::new();
        write_len(&mut out, occurrences.len());
        for secret in occurrences {
            let next = indices.len() as u32;
            write_u32(&mut out, *indices.entry(secret).or_insert(next));
        }
        ProofId(out)
    }

    fn write_node(&self, out: &mut Vec<u8>, expanded: bool) {
        match self.kind() {
            StatementKind::DLRep(dlrep) => {
                out.push(TAG_DLREP);
                write_len(out, dlrep.expr().len());
                dlrep.expr().bases().for_each(|base| write_element(out, base));
                write_element(out, dlrep.lhs());
            }
            StatementKind::And(children) | StatementKind::Or(children) => {
                let tag = match self.kind() {
                    StatementKind::And(_) => TAG_AND,
                    _ => TAG_OR,
                };
                out.push(tag);
                write_len(out, children.len());
                children.iter().for_each(|child| child.write_node(out, expanded));
            }
            StatementKind::Extended(extended) => {
                let statement = extended.statement();
                out.push(TAG_EXTENDED);
                write_len_prefixed(out, statement.name().as_bytes());
                let elements = statement.public_elements();
                write_len(out, elements.len());
                out.extend_from_slice(&serialize_elements(&elements));
                write_len_prefixed(out, &statement.public_label());
                match (extended.precommitment(), extended.constructed()) {
                    (Some(precommitment), Some(constructed)) if expanded => {
                        out.push(0x01);
                        write_len(out, precommitment.len());
                        out.extend_from_slice(&serialize_elements(precommitment));
                        constructed.write_node(out, expanded);
                    }
                    _ => out.push(0x00),
                }
            }
        }
    }
}
