// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Messages exchanged during the three-move join protocol, and the statements both sides
//! prove and verify.
//!
//! ```text
//!   Issuer                                   Holder
//!   join_1(id)        ── JoinTicket ──▶
//!                     ◀── JoinRequest ──     join_1(id, ticket)    C' = s'·h1 + t·h2 + x·h3
//!   join_2(id, req)   ── s'' ──────────▶
//!                     ◀── entry, proof ──    join_2(s'')           Y = x·u0
//!   join_3(id, ...)   ── JoinResponse ─▶     join_3(response, pk)  check e(A, pk + e·G2) = e(h0 + s·h1 + t·h2 + x·h3, G2)
//! ```

use group::Group;

use crate::{
    backend::PairingBackend,
    bbs::{params::Params, schnorr::{Statement, ZkPoK}},
    errors::Error,
    utils::util::scalar_to_bytes,
};

/// Number of secret messages in a group credential: `(s, t, x)`.
pub const CREDENTIAL_MESSAGES: usize = 3;

/// Issuer's answer to a join request: provisional registration index and a fresh session nonce.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinTicket<B: PairingBackend> {
    pub index: u64,
    pub nonce: B::Scalar,
}

/// Holder's blinded commitment `C' = s'·h1 + t·h2 + x·h3` with a proof of its opening.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinRequest<B: PairingBackend> {
    pub blinded_commitment: B::G1,
    pub proof: ZkPoK<B>,
}

/// Binds a holder id to the pseudonym `x·u0`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RegistrationEntry<B: PairingBackend> {
    pub holder_id: String,
    pub pseudonym: B::G1,
}

/// The issued credential: `A`, the exponent `e` and the issuer's share `s''` of `s`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JoinResponse<B: PairingBackend> {
    pub index: u64,
    pub a: B::G1,
    pub e: B::Scalar,
    pub s_issuer: B::Scalar,
}

/// One line of the issuer's append-only registration log.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Registration<B: PairingBackend> {
    pub index: u64,
    pub entry: RegistrationEntry<B>,
    pub e: B::Scalar,
}

pub(crate) fn check_join_params<B: PairingBackend>(params: &Params<B>) -> Result<(), Error> {
    if params.max_messages() < CREDENTIAL_MESSAGES {
        return Err(Error::InvalidArgument(format!(
            "join needs parameters for at least {} messages",
            CREDENTIAL_MESSAGES
        )));
    }
    Ok(())
}

/// `C' = s'·h1 + t·h2 + x·h3`
pub(crate) fn commitment_statement<B: PairingBackend>(params: &Params<B>, blinded: B::G1) -> Statement<B> {
    let bases = params.generators()[1..=CREDENTIAL_MESSAGES].to_vec();
    Statement::new(bases, blinded)
}

/// `Y = x·u0`, with the same witness vector as [`commitment_statement`].
pub(crate) fn pseudonym_statement<B: PairingBackend>(params: &Params<B>, pseudonym: B::G1) -> Statement<B> {
    let id = B::G1::identity();
    Statement::new(vec![id, id, params.pseudonym_base()], pseudonym)
}

pub(crate) fn join_context<B: PairingBackend>(label: &[u8], holder_id: &str, nonce: &B::Scalar) -> Vec<u8> {
    let mut context = label.to_vec();
    context.extend_from_slice(&(holder_id.len() as u64).to_be_bytes());
    context.extend_from_slice(holder_id.as_bytes());
    context.extend_from_slice(&scalar_to_bytes(nonce));
    context
}

pub(crate) const JOIN_COMMIT_LABEL: &[u8] = b"JOIN_COMMIT_";
pub(crate) const JOIN_REGISTER_LABEL: &[u8] = b"JOIN_REGISTER_";
