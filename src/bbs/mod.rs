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

//! BBS signatures over committed message vectors.
//!
//! A signature on the commitment `C = h0 + Σ m_i·h[i+1]` is the pair `(A, e)` with
//! `A = C·(e + sk)^-1`, and verifies as `e(A, pk + e·G2) == e(C, G2)`. A holder of a signature
//! can prove possession of it while revealing only some of the messages with a
//! [`proof::SignatureProof`]: the proof is zero-knowledge in the hidden messages and
//! two proofs built from the same signature cannot be linked.
//!
//! Parameters are derived from public seeds (see [`params::Params::generate`]), so there is no
//! trusted setup beyond agreeing on the backend.

/// Generator vector and pseudonym base
pub mod params;
/// Pedersen vector commitments
pub mod commitment;
pub mod keys;
pub mod message;
pub mod signature;
/// Selective-disclosure signature proof of knowledge
pub mod proof;
/// Schnorr proofs of knowledge for linear relations
pub mod schnorr;
