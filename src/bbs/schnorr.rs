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

//! Fiat-Shamir Schnorr proofs of knowledge for linear relations in G1.
//!
//! A proof shows knowledge of witnesses `w_1..w_k` satisfying every statement
//! `target_j = Σ_i w_i·bases_j[i]`. A witness shared by several statements is proven equal
//! across them. Identity bases mark witnesses a statement does not use.

use rand::{CryptoRng, RngCore};

use crate::{
    backend::PairingBackend,
    errors::Error,
    utils::util::{calculate_random_scalars, i2osp, scalar_from_bytes, scalar_len, scalar_to_bytes},
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ZkPoK<B: PairingBackend> {
    pub(crate) responses: Vec<B::Scalar>,
    pub(crate) challenge: B::Scalar,
}

#[derive(Clone, Debug)]
pub(crate) struct Statement<B: PairingBackend> {
    pub(crate) bases: Vec<B::G1>,
    pub(crate) target: B::G1,
}

impl<B: PairingBackend> Statement<B> {
    pub(crate) fn new(bases: Vec<B::G1>, target: B::G1) -> Self {
        Self { bases, target }
    }
}

impl<B: PairingBackend> ZkPoK<B> {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.responses
            .iter()
            .for_each(|r| bytes.extend_from_slice(&scalar_to_bytes(r)));
        bytes.extend_from_slice(&scalar_to_bytes(&self.challenge));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let len = scalar_len::<B::Scalar>();
        if bytes.is_empty() || bytes.len() % len != 0 {
            return Err(Error::DeserializationError("invalid proof length".to_owned()));
        }

        let mut responses = bytes
            .chunks_exact(len)
            .map(scalar_from_bytes)
            .collect::<Result<Vec<B::Scalar>, Error>>()?;
        // at least the challenge is always present
        let challenge = responses
            .pop()
            .ok_or_else(|| Error::DeserializationError("missing challenge".to_owned()))?;

        Ok(Self { responses, challenge })
    }
}

pub(crate) fn prove<B, R>(
    statements: &[Statement<B>],
    witnesses: &[B::Scalar],
    context: &[u8],
    rng: &mut R,
) -> Result<ZkPoK<B>, Error>
where
    B: PairingBackend,
    R: RngCore + CryptoRng,
{
    check_shape(statements, witnesses.len())?;

    let blinds: Vec<B::Scalar> = calculate_random_scalars(witnesses.len(), rng);
    let commitments: Vec<B::G1> = statements
        .iter()
        .map(|st| linear_combination::<B>(&st.bases, &blinds))
        .collect();

    let challenge = calculate_challenge(statements, &commitments, context)?;

    let responses = blinds
        .iter()
        .zip(witnesses)
        .map(|(blind, w)| *blind + *w * challenge)
        .collect();

    Ok(ZkPoK { responses, challenge })
}

pub(crate) fn verify<B: PairingBackend>(
    statements: &[Statement<B>],
    proof: &ZkPoK<B>,
    context: &[u8],
) -> Result<(), Error> {
    check_shape(statements, proof.responses.len()).map_err(|_| Error::InvalidCommitmentProof)?;

    let commitments: Vec<B::G1> = statements
        .iter()
        .map(|st| linear_combination::<B>(&st.bases, &proof.responses) - st.target * proof.challenge)
        .collect();

    let cv = calculate_challenge(statements, &commitments, context)?;

    if cv != proof.challenge {
        Err(Error::InvalidCommitmentProof)
    } else {
        Ok(())
    }
}

fn check_shape<B: PairingBackend>(statements: &[Statement<B>], k: usize) -> Result<(), Error> {
    if statements.is_empty() || statements.iter().any(|st| st.bases.len() != k) {
        return Err(Error::InvalidArgument("statement bases do not match witness count".to_owned()));
    }
    Ok(())
}

fn linear_combination<B: PairingBackend>(bases: &[B::G1], scalars: &[B::Scalar]) -> B::G1 {
    bases.iter().zip(scalars).map(|(g, s)| *g * s).sum()
}

fn calculate_challenge<B: PairingBackend>(
    statements: &[Statement<B>],
    commitments: &[B::G1],
    context: &[u8],
) -> Result<B::Scalar, Error> {
    let challenge_dst = [B::ID, b"ZKPOK_H2S_"].concat();

    let mut c_arr: Vec<u8> = Vec::new();
    c_arr.extend_from_slice(&i2osp(statements.len(), 8));
    for (st, t) in statements.iter().zip(commitments) {
        c_arr.extend_from_slice(&i2osp(st.bases.len(), 8));
        st.bases
            .iter()
            .for_each(|g| c_arr.extend_from_slice(&B::g1_to_bytes(g)));
        c_arr.extend_from_slice(&B::g1_to_bytes(&st.target));
        c_arr.extend_from_slice(&B::g1_to_bytes(t));
    }
    c_arr.extend_from_slice(&i2osp(context.len(), 8));
    c_arr.extend_from_slice(context);

    B::hash_to_scalar(&c_arr, &challenge_dst)
}
