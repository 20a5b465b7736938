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

use group::Group;
use rand::{CryptoRng, RngCore};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use super::{commitment::core_commit, keys::PublicKey, params::Params, signature::Signature};
use crate::{
    backend::PairingBackend,
    errors::Error,
    utils::util::{
        calculate_random_scalars, get_messages, get_remaining_indexes, i2osp, normalize_indexes,
        random_nonzero_scalar, scalar_from_bytes, scalar_len, scalar_to_bytes,
    },
};

/// Signature proof of knowledge with selective disclosure.
///
/// `a_bar = r·A` and `b_bar = r·C - e·a_bar` are a re-randomised statement of the signature,
/// `challenge` is the Fiat-Shamir challenge, `s` and `t` answer for `r` and `e`, and `u`
/// holds one response per hidden message in increasing index order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignatureProof<B: PairingBackend> {
    a_bar: B::G1,
    b_bar: B::G1,
    s: B::Scalar,
    t: B::Scalar,
    u: Vec<B::Scalar>,
    challenge: B::Scalar,
}

impl<B: PairingBackend> SignatureProof<B> {
    pub fn a_bar(&self) -> B::G1 {
        self.a_bar
    }

    pub fn b_bar(&self) -> B::G1 {
        self.b_bar
    }

    pub fn challenge(&self) -> B::Scalar {
        self.challenge
    }

    /// Number of messages the proof keeps hidden.
    pub fn hidden_count(&self) -> usize {
        self.u.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = B::g1_to_bytes(&self.a_bar);
        bytes.extend_from_slice(&B::g1_to_bytes(&self.b_bar));
        bytes.extend_from_slice(&scalar_to_bytes(&self.s));
        bytes.extend_from_slice(&scalar_to_bytes(&self.t));
        self.u
            .iter()
            .for_each(|v| bytes.extend_from_slice(&scalar_to_bytes(v)));
        bytes.extend_from_slice(&scalar_to_bytes(&self.challenge));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let g1 = B::G1_BYTES;
        let sl = scalar_len::<B::Scalar>();
        if bytes.len() < 2 * g1 + 3 * sl || (bytes.len() - 2 * g1) % sl != 0 {
            return Err(Error::DeserializationError("invalid proof length".to_owned()));
        }

        let a_bar = B::g1_from_bytes(&bytes[0..g1])?;
        let b_bar = B::g1_from_bytes(&bytes[g1..2 * g1])?;

        let mut scalars = bytes[2 * g1..]
            .chunks_exact(sl)
            .map(scalar_from_bytes)
            .collect::<Result<Vec<B::Scalar>, Error>>()?;

        let challenge = scalars
            .pop()
            .ok_or_else(|| Error::DeserializationError("missing challenge".to_owned()))?;
        let u = scalars.split_off(2);

        Ok(Self {
            a_bar,
            b_bar,
            s: scalars[0],
            t: scalars[1],
            u,
            challenge,
        })
    }

    /// Prove knowledge of `signature` over `messages`, revealing only the messages at
    /// `disclosed_indexes`. `ph` is an optional presentation header (e.g. a verifier nonce)
    /// bound into the challenge.
    pub fn create<R>(
        params: &Params<B>,
        pk: &PublicKey<B>,
        signature: &Signature<B>,
        messages: &[B::Scalar],
        disclosed_indexes: &[usize],
        ph: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        R: RngCore + CryptoRng,
    {
        core_proof_gen(params, pk, signature, messages, disclosed_indexes, ph, rng)
    }

    /// Verify the proof against the disclosed messages. `disclosed_messages[k]` is the
    /// message at position `disclosed_indexes[k]`; the pairs may come in any order.
    pub fn verify(
        &self,
        params: &Params<B>,
        pk: &PublicKey<B>,
        disclosed_messages: &[B::Scalar],
        disclosed_indexes: &[usize],
        ph: Option<&[u8]>,
    ) -> Result<(), Error> {
        if disclosed_messages.len() != disclosed_indexes.len() {
            return Err(Error::InvalidArgument(
                "number of disclosed indexes different from number of disclosed messages".to_owned(),
            ));
        }

        let mut disclosed: Vec<(usize, B::Scalar)> = disclosed_indexes
            .iter()
            .copied()
            .zip(disclosed_messages.iter().copied())
            .collect();
        disclosed.sort_by_key(|(i, _)| *i);

        let L = self.u.len() + disclosed.len();
        if L > params.max_messages() {
            return Err(Error::OutOfRange {
                len: L,
                max: params.max_messages(),
            });
        }

        let indexes: Vec<usize> = disclosed.iter().map(|(i, _)| *i).collect();
        let indexes = normalize_indexes(L, &indexes)?;
        let messages: Vec<B::Scalar> = disclosed.iter().map(|(_, m)| *m).collect();

        core_proof_verify(params, pk, self, &messages, &indexes, ph)
    }
}

impl<B: PairingBackend> Serialize for SignatureProof<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for SignatureProof<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(encoded).map_err(D::Error::custom)?;
        Self::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

struct ProofInitResult<B: PairingBackend> {
    a_bar: B::G1,
    b_bar: B::G1,
    u_commitment: B::G1,
}

fn core_proof_gen<B, R>(
    params: &Params<B>,
    pk: &PublicKey<B>,
    signature: &Signature<B>,
    messages: &[B::Scalar],
    disclosed_indexes: &[usize],
    ph: Option<&[u8]>,
    rng: &mut R,
) -> Result<SignatureProof<B>, Error>
where
    B: PairingBackend,
    R: RngCore + CryptoRng,
{
    let L = messages.len();
    let disclosed_indexes = normalize_indexes(L, disclosed_indexes)?;
    let undisclosed_indexes = get_remaining_indexes(L, &disclosed_indexes);
    let U = undisclosed_indexes.len();

    let disclosed_messages = get_messages(messages, &disclosed_indexes);
    let undisclosed_messages = get_messages(messages, &undisclosed_indexes);

    let r: B::Scalar = random_nonzero_scalar(rng);
    let random_scalars: Vec<B::Scalar> = calculate_random_scalars(2 + U, rng);

    let init_res = proof_init(
        params,
        signature,
        messages,
        r,
        &random_scalars,
        &disclosed_indexes,
        &undisclosed_indexes,
    )?;

    let challenge = proof_challenge_calculate(pk, &init_res, &disclosed_indexes, &disclosed_messages, ph)?;

    Ok(proof_finalize(
        &init_res,
        challenge,
        r,
        signature.e,
        &random_scalars,
        &undisclosed_messages,
    ))
}

/// `P = h[0] + Σ_{i disclosed} m_i·h[i+1]`, the part of the commitment the verifier can
/// rebuild on its own.
fn disclosed_aggregate<B: PairingBackend>(
    params: &Params<B>,
    disclosed_indexes: &[usize],
    disclosed_messages: &[B::Scalar],
) -> B::G1 {
    let h = params.generators();
    let mut P = h[0];
    for (&i, m) in disclosed_indexes.iter().zip(disclosed_messages) {
        P += h[i + 1] * m;
    }
    P
}

fn proof_init<B: PairingBackend>(
    params: &Params<B>,
    signature: &Signature<B>,
    messages: &[B::Scalar],
    r: B::Scalar,
    random_scalars: &[B::Scalar],
    disclosed_indexes: &[usize],
    undisclosed_indexes: &[usize],
) -> Result<ProofInitResult<B>, Error> {
    let U = undisclosed_indexes.len();
    if random_scalars.len() != 2 + U {
        return Err(Error::InvalidArgument("random scalars not valid".to_owned()));
    }

    let alpha = random_scalars[0];
    let beta = random_scalars[1];
    let deltas = &random_scalars[2..];

    let commitment = core_commit(params, messages)?;

    let a_bar = signature.a * r;
    let b_bar = commitment * r + a_bar * (-signature.e);

    let h = params.generators();
    let P = disclosed_aggregate(params, disclosed_indexes, &get_messages(messages, disclosed_indexes));

    let mut u_commitment = P * alpha + a_bar * beta;
    for (j, &i) in undisclosed_indexes.iter().enumerate() {
        u_commitment += h[i + 1] * deltas[j];
    }

    Ok(ProofInitResult {
        a_bar,
        b_bar,
        u_commitment,
    })
}

fn proof_challenge_calculate<B: PairingBackend>(
    pk: &PublicKey<B>,
    init_res: &ProofInitResult<B>,
    disclosed_indexes: &[usize],
    disclosed_messages: &[B::Scalar],
    ph: Option<&[u8]>,
) -> Result<B::Scalar, Error> {
    let R = disclosed_indexes.len();
    if disclosed_messages.len() != R {
        return Err(Error::InvalidArgument(
            "number of disclosed indexes different from number of disclosed messages".to_owned(),
        ));
    }

    let ph = ph.unwrap_or(b"");

    let mut c_arr: Vec<u8> = Vec::new();
    c_arr.extend_from_slice(&pk.to_bytes());
    c_arr.extend_from_slice(&B::g1_to_bytes(&init_res.a_bar));
    c_arr.extend_from_slice(&B::g1_to_bytes(&init_res.b_bar));
    c_arr.extend_from_slice(&B::g1_to_bytes(&init_res.u_commitment));
    c_arr.extend_from_slice(&i2osp(R, 8));
    disclosed_indexes
        .iter()
        .for_each(|&i| c_arr.extend_from_slice(&i2osp(i, 8)));
    disclosed_messages
        .iter()
        .for_each(|m| c_arr.extend_from_slice(&scalar_to_bytes(m)));
    c_arr.extend_from_slice(&i2osp(ph.len(), 8));
    c_arr.extend_from_slice(ph);

    B::hash_to_scalar(&c_arr, &B::h2s_dst())
}

fn proof_finalize<B: PairingBackend>(
    init_res: &ProofInitResult<B>,
    challenge: B::Scalar,
    r: B::Scalar,
    e: B::Scalar,
    random_scalars: &[B::Scalar],
    undisclosed_messages: &[B::Scalar],
) -> SignatureProof<B> {
    let alpha = random_scalars[0];
    let beta = random_scalars[1];
    let deltas = &random_scalars[2..];

    let s = alpha + r * challenge;
    let t = beta - e * challenge;
    let u = deltas
        .iter()
        .zip(undisclosed_messages)
        .map(|(delta, m)| *delta + r * *m * challenge)
        .collect();

    SignatureProof {
        a_bar: init_res.a_bar,
        b_bar: init_res.b_bar,
        s,
        t,
        u,
        challenge,
    }
}

fn core_proof_verify<B: PairingBackend>(
    params: &Params<B>,
    pk: &PublicKey<B>,
    proof: &SignatureProof<B>,
    disclosed_messages: &[B::Scalar],
    disclosed_indexes: &[usize],
    ph: Option<&[u8]>,
) -> Result<(), Error> {
    if bool::from(proof.a_bar.is_identity()) {
        return Err(Error::ProofRejected("a_bar is the identity".to_owned()));
    }

    let init_res = proof_verify_init(params, proof, disclosed_messages, disclosed_indexes);

    let challenge = proof_challenge_calculate(pk, &init_res, disclosed_indexes, disclosed_messages, ph)?;

    if proof.challenge != challenge {
        return Err(Error::ProofRejected("invalid challenge".to_owned()));
    }

    let BP2 = B::G2::generator();
    if B::pairing(&proof.a_bar, &pk.0) == B::pairing(&proof.b_bar, &BP2) {
        Ok(())
    } else {
        Err(Error::ProofRejected("pairing check failed".to_owned()))
    }
}

fn proof_verify_init<B: PairingBackend>(
    params: &Params<B>,
    proof: &SignatureProof<B>,
    disclosed_messages: &[B::Scalar],
    disclosed_indexes: &[usize],
) -> ProofInitResult<B> {
    let L = proof.u.len() + disclosed_indexes.len();
    let undisclosed_indexes = get_remaining_indexes(L, disclosed_indexes);
    let h = params.generators();

    let P = disclosed_aggregate(params, disclosed_indexes, disclosed_messages);

    let mut u_commitment = P * proof.s + proof.a_bar * proof.t - proof.b_bar * proof.challenge;
    for (j, &i) in undisclosed_indexes.iter().enumerate() {
        u_commitment += h[i + 1] * proof.u[j];
    }

    ProofInitResult {
        a_bar: proof.a_bar,
        b_bar: proof.b_bar,
        u_commitment,
    }
}
