//! # Statement Composition with AND/OR Logic
//!
//! This module defines [`Statement`], a tree of proof statements:
//! - [`DLRep`] leaves (knowledge of a discrete-log representation),
//! - conjunctions (`And`) of sub-statements,
//! - disjunctions (`Or`) of sub-statements, proven CDS-style: every branch but
//!   one is simulated, and the sub-challenges sum to the verifier challenge in `ℤ_{2^128}`,
//! - [`Extended`] statements, which expand into a sub-tree after a precommitment.
//!
//! ## Example Composition
//!
//! ```ignore
//! And(
//!    Or(DLRep(Y0, x0 * g0), DLRep(Y1, x1 * g1)),
//!    DLRep(Y2, x2 * g2 + r * h),
//!    DLNotEqual((Y2, g2), (Y3, g3), x2),
//! )
//! ```
//!
//! A secret used inside an Or may not be used outside of it, or the responses
//! would reveal which branch is real. [`Statement::validate`] enforces this
//! rule and runs before every proof and verification.

use core::ops::{BitAnd, BitOr};
use std::collections::HashMap;

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use tracing::{instrument, trace};

use crate::challenge::Challenge;
use crate::dlrep::DLRep;
use crate::errors::{into_verdict, Error};
use crate::expression::{Expression, Secret, SecretValues};
use crate::extended::{Extended, ExtendedStatement, Precommitment};
use crate::fiat_shamir::{Nizk, DEFAULT_SESSION_ID};
use crate::group::serialization::write_element;
use crate::interactive::{Prover, Verifier};
use crate::transcript::{NITranscript, SimulationTranscript};

/// The variants of a [`Statement`].
#[derive(Clone, Debug)]
pub enum StatementKind<G: PrimeGroup> {
    DLRep(DLRep<G>),
    And(Vec<Statement<G>>),
    Or(Vec<Statement<G>>),
    Extended(Extended<G>),
}

/// A composable proof statement.
///
/// The `simulated` flag marks a statement the prover will not prove for real;
/// inside an Or, a simulated branch is never chosen as the live branch.
#[derive(Clone, Debug)]
pub struct Statement<G: PrimeGroup> {
    kind: StatementKind<G>,
    simulated: bool,
}

/// Commitment of a statement tree. Extended nodes contribute the commitment
/// of their constructed statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commitment<G: PrimeGroup> {
    Simple(G),
    And(Vec<Commitment<G>>),
    Or(Vec<Commitment<G>>),
}

/// Responses of a statement tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response<F: Field> {
    /// One response per term of a DLRep.
    Simple(Vec<F>),
    And(Vec<Response<F>>),
    /// Sub-challenges and responses of every branch, in branch order.
    Or(Vec<Challenge>, Vec<Response<F>>),
}

/// Prover state between commitment and response.
#[derive(Clone, Debug)]
pub(crate) enum ProverState<F: Field> {
    Simple,
    And(Vec<ProverState<F>>),
    Or(Vec<OrBranchState<F>>),
    Extended(Box<ProverState<F>>),
}

#[derive(Clone, Debug)]
pub(crate) enum OrBranchState<F: Field> {
    Live(ProverState<F>),
    Simulated {
        challenge: Challenge,
        response: Response<F>,
    },
}

impl<G: PrimeGroup> Commitment<G> {
    /// Pre-order concatenation of the committed elements.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            Commitment::Simple(element) => write_element(out, element),
            Commitment::And(children) | Commitment::Or(children) => {
                children.iter().for_each(|child| child.write_bytes(out))
            }
        }
    }
}

impl<G: PrimeGroup> From<DLRep<G>> for Statement<G> {
    fn from(dlrep: DLRep<G>) -> Self {
        Self::from_kind(StatementKind::DLRep(dlrep))
    }
}

impl<G: PrimeGroup> From<Extended<G>> for Statement<G> {
    fn from(extended: Extended<G>) -> Self {
        Self::from_kind(StatementKind::Extended(extended))
    }
}

impl<G: PrimeGroup> Statement<G> {
    fn from_kind(kind: StatementKind<G>) -> Self {
        Self {
            kind,
            simulated: false,
        }
    }

    /// Leaf statement `lhs = expr`.
    pub fn dlrep(lhs: G, expr: Expression<G>) -> Result<Self, Error> {
        Ok(DLRep::new(lhs, expr)?.into())
    }

    /// Conjunction of at least two statements.
    pub fn and<T: Into<Statement<G>>>(children: impl IntoIterator<Item = T>) -> Result<Self, Error> {
        let statement = Self::from_kind(StatementKind::And(
            children.into_iter().map(Into::into).collect(),
        ));
        statement.validate()?;
        Ok(statement)
    }

    /// Disjunction of at least two statements.
    pub fn or<T: Into<Statement<G>>>(children: impl IntoIterator<Item = T>) -> Result<Self, Error> {
        let statement = Self::from_kind(StatementKind::Or(
            children.into_iter().map(Into::into).collect(),
        ));
        statement.validate()?;
        Ok(statement)
    }

    /// Wraps an extended statement.
    pub fn extended(statement: impl ExtendedStatement<G> + 'static) -> Self {
        Extended::new(statement).into()
    }

    pub fn kind(&self) -> &StatementKind<G> {
        &self.kind
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    pub fn set_simulated(&mut self, simulated: bool) {
        self.simulated = simulated;
    }

    /// Marks the statement as simulated.
    pub fn simulated(mut self) -> Self {
        self.simulated = true;
        self
    }

    /// Distinct secrets of the statement, in order of first occurrence.
    pub fn secrets(&self) -> Vec<Secret<G::Scalar>> {
        let mut occurrences = Vec::new();
        self.collect_secret_occurrences(false, &mut occurrences);
        let mut distinct: Vec<Secret<G::Scalar>> = Vec::new();
        for secret in occurrences {
            if !distinct.contains(&secret) {
                distinct.push(secret);
            }
        }
        distinct
    }

    /// Pre-order list of secret occurrences. With `expanded`, extended
    /// statements contribute their constructed statement when it exists.
    pub(crate) fn collect_secret_occurrences(
        &self,
        expanded: bool,
        out: &mut Vec<Secret<G::Scalar>>,
    ) {
        match &self.kind {
            StatementKind::DLRep(dlrep) => out.extend(dlrep.term_secrets().cloned()),
            StatementKind::And(children) | StatementKind::Or(children) => children
                .iter()
                .for_each(|child| child.collect_secret_occurrences(expanded, out)),
            StatementKind::Extended(extended) => match extended.constructed() {
                Some(constructed) if expanded => {
                    constructed.collect_secret_occurrences(expanded, out)
                }
                _ => out.extend(extended.statement().secrets()),
            },
        }
    }

    /// Values carried by the secret handles of the tree.
    pub(crate) fn carried_values(&self) -> SecretValues<G::Scalar> {
        let mut occurrences = Vec::new();
        self.collect_secret_occurrences(false, &mut occurrences);
        occurrences
            .into_iter()
            .filter_map(|secret| secret.value().map(|value| (secret, value)))
            .collect()
    }

    pub(crate) fn has_extended(&self) -> bool {
        match &self.kind {
            StatementKind::DLRep(_) => false,
            StatementKind::And(children) | StatementKind::Or(children) => {
                children.iter().any(Statement::has_extended)
            }
            StatementKind::Extended(_) => true,
        }
    }

    /// Whether the relation holds for `values`, as far as it can be evaluated
    /// before precommitting.
    pub fn is_satisfied(&self, values: &SecretValues<G::Scalar>) -> bool {
        match &self.kind {
            StatementKind::DLRep(dlrep) => dlrep.is_satisfied(values),
            StatementKind::And(children) => children.iter().all(|c| c.is_satisfied(values)),
            StatementKind::Or(children) => children
                .iter()
                .any(|c| !c.simulated && c.is_satisfied(values)),
            StatementKind::Extended(extended) => match extended.constructed() {
                Some(constructed) => constructed.is_satisfied(values),
                None => extended.statement().can_prove(values),
            },
        }
    }

    /// Whether the prover has every value it needs for this statement.
    fn has_values(&self, values: &SecretValues<G::Scalar>) -> bool {
        match &self.kind {
            StatementKind::DLRep(dlrep) => dlrep.has_values(values),
            StatementKind::And(children) => children.iter().all(|c| c.has_values(values)),
            StatementKind::Or(children) => {
                children.iter().any(|c| !c.simulated && c.has_values(values))
            }
            StatementKind::Extended(extended) => extended.statement().can_prove(values),
        }
    }

    /// Checks the arity of And/Or nodes and the secret-reuse rule of Or nodes.
    ///
    /// # Errors
    /// [`Error::InvalidArity`] or [`Error::InvalidSecretReuse`].
    pub fn validate(&self) -> Result<(), Error> {
        self.check_arity()?;
        let mut total = HashMap::new();
        self.count_secrets(&mut total);
        self.check_or_reuse(&total)
    }

    fn check_arity(&self) -> Result<(), Error> {
        let (kind, children) = match &self.kind {
            StatementKind::And(children) => ("And", children),
            StatementKind::Or(children) => ("Or", children),
            _ => return Ok(()),
        };
        if children.len() < 2 {
            return Err(Error::InvalidArity {
                kind,
                got: children.len(),
            });
        }
        children.iter().try_for_each(Statement::check_arity)
    }

    fn count_secrets(&self, counts: &mut HashMap<Secret<G::Scalar>, usize>) {
        let mut occurrences = Vec::new();
        self.collect_secret_occurrences(false, &mut occurrences);
        for secret in occurrences {
            *counts.entry(secret).or_default() += 1;
        }
    }

    fn check_or_reuse(&self, total: &HashMap<Secret<G::Scalar>, usize>) -> Result<(), Error> {
        match &self.kind {
            StatementKind::Or(children) => {
                let mut local = HashMap::new();
                self.count_secrets(&mut local);
                let mut reused: Vec<_> = local
                    .iter()
                    .filter(|(secret, count)| total.get(*secret).copied().unwrap_or(0) > **count)
                    .map(|(secret, _)| secret.name().to_owned())
                    .collect();
                reused.sort();
                if let Some(name) = reused.into_iter().next() {
                    return Err(Error::InvalidSecretReuse { name });
                }
                children.iter().try_for_each(|c| c.check_or_reuse(total))
            }
            StatementKind::And(children) => children.iter().try_for_each(|c| c.check_or_reuse(total)),
            StatementKind::DLRep(_) | StatementKind::Extended(_) => Ok(()),
        }
    }

    /// Prover side: chooses the live branch of every Or, precommits extended
    /// statements (simulating the precommitment on simulated branches) and
    /// returns the precommitment of the tree.
    pub(crate) fn prepare(
        &mut self,
        values: &mut SecretValues<G::Scalar>,
        simulated: bool,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Precommitment<G>, Error> {
        let simulated = simulated || self.simulated;
        match &mut self.kind {
            StatementKind::DLRep(dlrep) => {
                if !simulated {
                    if let Some(secret) = dlrep.term_secrets().find(|s| s.value_in(values).is_err()) {
                        return Err(Error::incomplete(secret.name()));
                    }
                }
                Ok(Precommitment::Empty)
            }
            StatementKind::And(children) => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children.iter_mut() {
                    parts.push(child.prepare(values, simulated, rng)?);
                }
                Ok(Precommitment::Composite(parts))
            }
            StatementKind::Or(children) => {
                if !simulated {
                    let live = select_live_branch(children, values)?;
                    trace!(live, branches = children.len(), "selected live branch");
                    for (index, child) in children.iter_mut().enumerate() {
                        child.simulated = index != live;
                    }
                }
                let mut parts = Vec::with_capacity(children.len());
                for child in children.iter_mut() {
                    parts.push(child.prepare(values, simulated, rng)?);
                }
                Ok(Precommitment::Composite(parts))
            }
            StatementKind::Extended(extended) => extended.prepare(values, simulated, rng),
        }
    }

    /// Prover side: commitment of a prepared tree. Simulated Or branches are
    /// simulated here under fresh sub-challenges.
    pub(crate) fn commit(
        &self,
        randomizers: &SecretValues<G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Commitment<G>, ProverState<G::Scalar>), Error> {
        match &self.kind {
            StatementKind::DLRep(dlrep) => Ok((
                Commitment::Simple(dlrep.commit(randomizers)?),
                ProverState::Simple,
            )),
            StatementKind::And(children) => {
                let mut commitments = Vec::with_capacity(children.len());
                let mut states = Vec::with_capacity(children.len());
                for child in children {
                    let (commitment, state) = child.commit(randomizers, rng)?;
                    commitments.push(commitment);
                    states.push(state);
                }
                Ok((Commitment::And(commitments), ProverState::And(states)))
            }
            StatementKind::Or(children) => {
                let mut commitments = Vec::with_capacity(children.len());
                let mut states = Vec::with_capacity(children.len());
                for child in children {
                    if child.simulated {
                        let (commitment, challenge, response) =
                            child.simulate_node(None, &mut SecretValues::new(), rng)?;
                        commitments.push(commitment);
                        states.push(OrBranchState::Simulated {
                            challenge,
                            response,
                        });
                    } else {
                        let (commitment, state) = child.commit(randomizers, rng)?;
                        commitments.push(commitment);
                        states.push(OrBranchState::Live(state));
                    }
                }
                Ok((Commitment::Or(commitments), ProverState::Or(states)))
            }
            StatementKind::Extended(extended) => {
                let (commitment, state) = extended.require_constructed()?.commit(randomizers, rng)?;
                Ok((commitment, ProverState::Extended(Box::new(state))))
            }
        }
    }

    /// Prover side: responses to `challenge`.
    pub(crate) fn respond(
        &self,
        state: ProverState<G::Scalar>,
        challenge: Challenge,
        randomizers: &SecretValues<G::Scalar>,
        values: &SecretValues<G::Scalar>,
    ) -> Result<Response<G::Scalar>, Error> {
        match (&self.kind, state) {
            (StatementKind::DLRep(dlrep), ProverState::Simple) => Ok(Response::Simple(
                dlrep.respond(randomizers, values, &challenge)?,
            )),
            (StatementKind::And(children), ProverState::And(states)) => children
                .iter()
                .zip(states)
                .map(|(child, state)| child.respond(state, challenge, randomizers, values))
                .collect::<Result<_, _>>()
                .map(Response::And),
            (StatementKind::Or(children), ProverState::Or(branches)) => {
                let simulated: Challenge = branches
                    .iter()
                    .filter_map(|branch| match branch {
                        OrBranchState::Simulated { challenge, .. } => Some(*challenge),
                        OrBranchState::Live(_) => None,
                    })
                    .sum();
                let live_challenge = challenge - simulated;

                let mut challenges = Vec::with_capacity(children.len());
                let mut responses = Vec::with_capacity(children.len());
                for (child, branch) in children.iter().zip(branches) {
                    match branch {
                        OrBranchState::Live(state) => {
                            challenges.push(live_challenge);
                            responses.push(child.respond(state, live_challenge, randomizers, values)?);
                        }
                        OrBranchState::Simulated {
                            challenge,
                            response,
                        } => {
                            challenges.push(challenge);
                            responses.push(response);
                        }
                    }
                }
                Ok(Response::Or(challenges, responses))
            }
            (StatementKind::Extended(extended), ProverState::Extended(state)) => extended
                .require_constructed()?
                .respond(*state, challenge, randomizers, values),
            _ => Err(Error::OutOfOrder("prover state does not match the statement")),
        }
    }

    /// Simulates a transcript of this node. Extended statements must already
    /// hold a (possibly simulated) precommitment.
    pub(crate) fn simulate_node(
        &self,
        challenge: Option<Challenge>,
        responses: &mut SecretValues<G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Commitment<G>, Challenge, Response<G::Scalar>), Error> {
        let challenge = match challenge {
            Some(challenge) => challenge,
            None => Challenge::random(rng),
        };
        match &self.kind {
            StatementKind::DLRep(dlrep) => {
                let (commitment, scalars) = dlrep.simulate(&challenge, responses, rng);
                Ok((Commitment::Simple(commitment), challenge, Response::Simple(scalars)))
            }
            StatementKind::And(children) => {
                let mut commitments = Vec::with_capacity(children.len());
                let mut child_responses = Vec::with_capacity(children.len());
                for child in children {
                    let (commitment, _, response) =
                        child.simulate_node(Some(challenge), responses, rng)?;
                    commitments.push(commitment);
                    child_responses.push(response);
                }
                Ok((
                    Commitment::And(commitments),
                    challenge,
                    Response::And(child_responses),
                ))
            }
            StatementKind::Or(children) => {
                let (last, rest) = children.split_last().ok_or(Error::InvalidArity {
                    kind: "Or",
                    got: 0,
                })?;
                let mut commitments = Vec::with_capacity(children.len());
                let mut challenges = Vec::with_capacity(children.len());
                let mut child_responses = Vec::with_capacity(children.len());
                for child in rest {
                    let (commitment, sub_challenge, response) =
                        child.simulate_node(None, &mut SecretValues::new(), rng)?;
                    commitments.push(commitment);
                    challenges.push(sub_challenge);
                    child_responses.push(response);
                }
                let residual = challenge - challenges.iter().sum::<Challenge>();
                let (commitment, sub_challenge, response) =
                    last.simulate_node(Some(residual), &mut SecretValues::new(), rng)?;
                commitments.push(commitment);
                challenges.push(sub_challenge);
                child_responses.push(response);
                Ok((
                    Commitment::Or(commitments),
                    challenge,
                    Response::Or(challenges, child_responses),
                ))
            }
            StatementKind::Extended(extended) => {
                extended
                    .require_constructed()?
                    .simulate_node(Some(challenge), responses, rng)
            }
        }
    }

    /// Verifier side: materializes the constructed statements from a received precommitment.
    pub(crate) fn process_precommitment(
        &mut self,
        precommitment: &Precommitment<G>,
    ) -> Result<(), Error> {
        match (&mut self.kind, precommitment) {
            (StatementKind::DLRep(_), Precommitment::Empty) => Ok(()),
            (
                StatementKind::And(children) | StatementKind::Or(children),
                Precommitment::Composite(parts),
            ) if children.len() == parts.len() => children
                .iter_mut()
                .zip(parts)
                .try_for_each(|(child, part)| child.process_precommitment(part)),
            (StatementKind::Extended(extended), Precommitment::Extended { elements, inner }) => {
                extended.receive(elements, inner)
            }
            _ => Err(Error::StatementMismatch),
        }
    }

    /// Verifier side: runs the validation hooks of every extended statement.
    pub(crate) fn validate_precommitments(&self) -> Result<(), Error> {
        match &self.kind {
            StatementKind::DLRep(_) => Ok(()),
            StatementKind::And(children) | StatementKind::Or(children) => {
                children.iter().try_for_each(Statement::validate_precommitments)
            }
            StatementKind::Extended(extended) => extended.validate(),
        }
    }

    /// Verifier side: recomputes the commitment from the challenge and responses.
    ///
    /// # Errors
    /// [`Error::VerificationFailure`] if the sub-challenges of an Or do not sum
    /// to its challenge, [`Error::StatementMismatch`] if the responses do not
    /// have the shape of the statement.
    pub(crate) fn recompute_commitment(
        &self,
        challenge: &Challenge,
        response: &Response<G::Scalar>,
    ) -> Result<Commitment<G>, Error> {
        match (&self.kind, response) {
            (StatementKind::DLRep(dlrep), Response::Simple(scalars)) => Ok(Commitment::Simple(
                dlrep.recompute_commitment(challenge, scalars)?,
            )),
            (StatementKind::And(children), Response::And(responses))
                if children.len() == responses.len() =>
            {
                children
                    .iter()
                    .zip(responses)
                    .map(|(child, response)| child.recompute_commitment(challenge, response))
                    .collect::<Result<_, _>>()
                    .map(Commitment::And)
            }
            (StatementKind::Or(children), Response::Or(challenges, responses))
                if children.len() == challenges.len() && children.len() == responses.len() =>
            {
                if challenges.iter().sum::<Challenge>() != *challenge {
                    tracing::debug!("or sub-challenges do not sum to the challenge");
                    return Err(Error::VerificationFailure);
                }
                children
                    .iter()
                    .zip(challenges)
                    .zip(responses)
                    .map(|((child, c), response)| child.recompute_commitment(c, response))
                    .collect::<Result<_, _>>()
                    .map(Commitment::Or)
            }
            (StatementKind::Extended(extended), response) => extended
                .require_constructed()?
                .recompute_commitment(challenge, response),
            _ => Err(Error::StatementMismatch),
        }
    }

    /// Verifier side: checks that each secret received the same response
    /// everywhere it was answered under the same challenge. Or branches run
    /// under their own sub-challenges and are checked separately.
    pub(crate) fn check_responses_consistency(
        &self,
        response: &Response<G::Scalar>,
        seen: &mut SecretValues<G::Scalar>,
    ) -> Result<(), Error> {
        match (&self.kind, response) {
            (StatementKind::DLRep(dlrep), Response::Simple(scalars)) => {
                dlrep.check_responses_consistency(scalars, seen)
            }
            (StatementKind::And(children), Response::And(responses))
                if children.len() == responses.len() =>
            {
                children
                    .iter()
                    .zip(responses)
                    .try_for_each(|(child, response)| child.check_responses_consistency(response, seen))
            }
            (StatementKind::Or(children), Response::Or(_, responses))
                if children.len() == responses.len() =>
            {
                children.iter().zip(responses).try_for_each(|(child, response)| {
                    child.check_responses_consistency(response, &mut SecretValues::new())
                })
            }
            (StatementKind::Extended(extended), response) => extended
                .require_constructed()?
                .check_responses_consistency(response, seen),
            _ => Err(Error::StatementMismatch),
        }
    }

    /// Creates an interactive prover. Values of `values` take precedence over
    /// the values carried by the secrets of the statement.
    pub fn get_prover(&self, values: &SecretValues<G::Scalar>) -> Result<Prover<G>, Error> {
        Prover::new(self, values)
    }

    /// Creates an interactive verifier.
    pub fn get_verifier(&self) -> Result<Verifier<G>, Error> {
        Verifier::new(self)
    }

    /// Non-interactive proof under the default session identifier.
    pub fn prove(
        &self,
        values: &SecretValues<G::Scalar>,
        message: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<NITranscript<G>, Error> {
        let nizk: Nizk<G> = Nizk::new(DEFAULT_SESSION_ID, self.clone());
        nizk.prove(values, message, rng)
    }

    /// Verifies a transcript produced by [`Statement::prove`].
    pub fn verify(&self, transcript: &NITranscript<G>, message: &[u8]) -> Result<bool, Error> {
        let nizk: Nizk<G> = Nizk::new(DEFAULT_SESSION_ID, self.clone());
        nizk.verify(transcript, message)
    }

    /// Simulates a transcript, under `challenge` if given.
    #[instrument(skip_all)]
    pub fn simulate(
        &self,
        challenge: Option<Challenge>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<SimulationTranscript<G>, Error> {
        self.validate()?;
        let statement_hash = self.statement_hash();
        let mut statement = self.clone();
        let precommitment = statement.prepare(&mut SecretValues::new(), true, rng)?;
        let (commitment, challenge, responses) =
            statement.simulate_node(challenge, &mut SecretValues::new(), rng)?;
        Ok(SimulationTranscript {
            commitment,
            challenge,
            responses,
            precommitment,
            statement_hash,
        })
    }

    /// Checks that a simulation transcript satisfies the verification
    /// equations of this statement. Validation hooks of extended statements
    /// are not run: they judge real precommitments.
    pub fn verify_simulation_consistency(
        &self,
        transcript: &SimulationTranscript<G>,
    ) -> Result<bool, Error> {
        let mut verifier = Verifier::new(self)?;
        into_verdict(check_simulation(&mut verifier, transcript))
    }
}

fn check_simulation<G: PrimeGroup>(
    verifier: &mut Verifier<G>,
    transcript: &SimulationTranscript<G>,
) -> Result<(), Error> {
    verifier.check_statement_hash(&transcript.statement_hash)?;
    verifier.process_precommitment(&transcript.precommitment)?;
    let statement = verifier.statement();
    let commitment = statement.recompute_commitment(&transcript.challenge, &transcript.responses)?;
    if commitment != transcript.commitment {
        return Err(Error::VerificationFailure);
    }
    statement.check_responses_consistency(&transcript.responses, &mut SecretValues::new())
}

/// Index of the branch an Or proves for real: the first non-simulated branch
/// whose relation holds, else the first one with all values known.
fn select_live_branch<G: PrimeGroup>(
    children: &[Statement<G>],
    values: &SecretValues<G::Scalar>,
) -> Result<usize, Error> {
    let candidates: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.simulated && child.has_values(values))
        .map(|(index, _)| index)
        .collect();
    candidates
        .iter()
        .copied()
        .find(|&index| children[index].is_satisfied(values))
        .or_else(|| candidates.first().copied())
        .ok_or(Error::NoLiveBranch)
}

/// `a & b`: flattens into `a` when it already is a non-simulated And.
impl<G: PrimeGroup> BitAnd for Statement<G> {
    type Output = Statement<G>;

    fn bitand(self, rhs: Statement<G>) -> Self::Output {
        match self {
            Statement {
                kind: StatementKind::And(mut children),
                simulated: false,
            } => {
                children.push(rhs);
                Statement::from_kind(StatementKind::And(children))
            }
            lhs => Statement::from_kind(StatementKind::And(vec![lhs, rhs])),
        }
    }
}

/// `a | b`: flattens into `a` when it already is a non-simulated Or.
impl<G: PrimeGroup> BitOr for Statement<G> {
    type Output = Statement<G>;

    fn bitor(self, rhs: Statement<G>) -> Self::Output {
        match self {
            Statement {
                kind: StatementKind::Or(mut children),
                simulated: false,
            } => {
                children.push(rhs);
                Statement::from_kind(StatementKind::Or(children))
            }
            lhs => Statement::from_kind(StatementKind::Or(vec![lhs, rhs])),
        }
    }
}
