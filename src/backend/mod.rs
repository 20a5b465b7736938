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

//! Algebraic backends.
//!
//! Every protocol component is generic over a [`PairingBackend`]: the scalar field, the two
//! source groups, the target group, the pairing and the hash functions all come from here.
//! Protocol code never touches a concrete curve, so a backend can be swapped without changing
//! a line of issuer, holder or verifier logic.
//!
//! Arithmetic in the scalar field and in the groups goes through the `ff` / `group` traits.
//! Production backends must provide constant-time scalar multiplication and inversion; the
//! protocol layer does not attempt to hide timing on its own.

use core::fmt::Debug;
use ff::PrimeField;
use group::Group;

use crate::errors::Error;

#[cfg(feature = "bls12381")]
/// BLS12-381 backends
pub mod bls12381;
/// Insecure modular-arithmetic backend
pub mod toy;

pub trait PairingBackend: Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    type Scalar: PrimeField;
    type G1: Group<Scalar = Self::Scalar>;
    type G2: Group<Scalar = Self::Scalar>;
    type Gt: Debug + PartialEq + Eq;

    /// Ciphersuite identifier, prefix of every domain separation tag.
    const ID: &'static [u8];
    const GENERATOR_SEED: &'static [u8];
    const PSEUDONYM_SEED: &'static [u8];
    const G1_BYTES: usize;
    const G2_BYTES: usize;

    fn pairing(p: &Self::G1, q: &Self::G2) -> Self::Gt;

    /// Deterministic map from octets to a point of G1.
    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<Self::G1, Error>;

    /// Deterministic map from octets to a non-zero scalar.
    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Self::Scalar, Error>;

    fn g1_to_bytes(p: &Self::G1) -> Vec<u8>;
    fn g1_from_bytes(bytes: &[u8]) -> Result<Self::G1, Error>;
    fn g2_to_bytes(p: &Self::G2) -> Vec<u8>;
    fn g2_from_bytes(bytes: &[u8]) -> Result<Self::G2, Error>;

    fn generator_dst() -> Vec<u8> {
        [Self::ID, b"GENERATOR_DST_"].concat()
    }

    fn h2s_dst() -> Vec<u8> {
        [Self::ID, b"H2S_"].concat()
    }

    fn map_msg_dst() -> Vec<u8> {
        [Self::ID, b"MAP_MSG_TO_SCALAR_AS_HASH_"].concat()
    }
}
