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

use std::fmt;
use std::sync::Arc;

use rand::{CryptoRng, RngCore};

use super::join::{
    check_join_params, commitment_statement, join_context, pseudonym_statement, JoinRequest, JoinResponse,
    JoinTicket, RegistrationEntry, JOIN_COMMIT_LABEL, JOIN_REGISTER_LABEL,
};
use crate::{
    backend::PairingBackend,
    bbs::{
        commitment::Commitment,
        keys::PublicKey,
        params::Params,
        proof::SignatureProof,
        schnorr::{self, ZkPoK},
        signature::Signature,
    },
    errors::Error,
    utils::util::random_nonzero_scalar,
};

/// The holder's private credential material `(A, s, t, x)`.
#[derive(Clone, PartialEq, Eq)]
pub struct HolderSecret<B: PairingBackend> {
    a: B::G1,
    s: B::Scalar,
    t: B::Scalar,
    x: B::Scalar,
}

impl<B: PairingBackend> fmt::Debug for HolderSecret<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HolderSecret(..)")
    }
}

/// A group credential obtained through the join protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Credential<B: PairingBackend> {
    secret: HolderSecret<B>,
    e: B::Scalar,
    index: u64,
}

impl<B: PairingBackend> Credential<B> {
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The public label `e` the issuer recorded for this holder.
    pub fn e(&self) -> B::Scalar {
        self.e
    }

    pub fn signature(&self) -> Signature<B> {
        Signature {
            a: self.secret.a,
            e: self.e,
        }
    }

    pub(crate) fn messages(&self) -> Vec<B::Scalar> {
        vec![self.secret.s, self.secret.t, self.secret.x]
    }
}

struct PendingJoin<B: PairingBackend> {
    holder_id: String,
    nonce: B::Scalar,
    s_prime: B::Scalar,
    t: B::Scalar,
    x: B::Scalar,
    s_issuer: Option<B::Scalar>,
}

impl<B: PairingBackend> PendingJoin<B> {
    fn witnesses(&self) -> [B::Scalar; 3] {
        [self.s_prime, self.t, self.x]
    }
}

/// A group member. Runs the holder side of the join protocol and produces proofs.
pub struct Holder<B: PairingBackend> {
    params: Arc<Params<B>>,
    pending: Option<PendingJoin<B>>,
    credential: Option<Credential<B>>,
}

impl<B: PairingBackend> Holder<B> {
    pub fn new(params: Arc<Params<B>>) -> Self {
        Self {
            params,
            pending: None,
            credential: None,
        }
    }

    pub fn params(&self) -> &Arc<Params<B>> {
        &self.params
    }

    pub fn credential(&self) -> Option<&Credential<B>> {
        self.credential.as_ref()
    }

    pub fn compute_commitment(&self, messages: &[B::Scalar]) -> Result<Commitment<B>, Error> {
        Commitment::commit(&self.params, messages)
    }

    /// Build a selective-disclosure proof for an arbitrary signature held by this party.
    pub fn create_proof<R>(
        &self,
        issuer_pk: &PublicKey<B>,
        signature: &Signature<B>,
        messages: &[B::Scalar],
        disclosed_indexes: &[usize],
        ph: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<SignatureProof<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        SignatureProof::create(&self.params, issuer_pk, signature, messages, disclosed_indexes, ph, rng)
    }

    /// Anonymous membership proof: an SPK over the credential with every message hidden.
    pub fn prove_credential<R>(
        &self,
        issuer_pk: &PublicKey<B>,
        ph: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<SignatureProof<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| Error::InvalidArgument("holder has no credential".to_owned()))?;
        self.create_proof(issuer_pk, &credential.signature(), &credential.messages(), &[], ph, rng)
    }

    /// Drop the pending join, if any.
    pub fn abort_join(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// First holder move: sample `(s', t, x)` and commit to them as `C' = s'·h1 + t·h2 + x·h3`.
    pub fn join_1<R>(&mut self, holder_id: &str, ticket: &JoinTicket<B>, rng: &mut R) -> Result<JoinRequest<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        check_join_params(&self.params)?;
        if self.pending.is_some() {
            return Err(Error::JoinInProgress(holder_id.to_owned()));
        }

        let pending = PendingJoin {
            holder_id: holder_id.to_owned(),
            nonce: ticket.nonce,
            s_prime: random_nonzero_scalar(rng),
            t: random_nonzero_scalar(rng),
            x: random_nonzero_scalar(rng),
            s_issuer: None,
        };

        let h = self.params.generators();
        let blinded_commitment = h[1] * pending.s_prime + h[2] * pending.t + h[3] * pending.x;

        let statement = [commitment_statement(&self.params, blinded_commitment)];
        let context = join_context::<B>(JOIN_COMMIT_LABEL, holder_id, &pending.nonce);
        let proof = schnorr::prove(&statement, &pending.witnesses(), &context, rng)?;

        self.pending = Some(pending);
        log::debug!("{} sent blinded commitment for index {}", holder_id, ticket.index);

        Ok(JoinRequest {
            blinded_commitment,
            proof,
        })
    }

    /// Second holder move: accept the issuer's share `s''` and register the pseudonym `x·u0`.
    pub fn join_2<R>(&mut self, s_issuer: B::Scalar, rng: &mut R) -> Result<(RegistrationEntry<B>, ZkPoK<B>), Error>
    where
        R: RngCore + CryptoRng,
    {
        let pending = self
            .pending
            .as_mut()
            .ok_or_else(|| Error::JoinStateError("join_2 before join_1".to_owned()))?;
        if pending.s_issuer.is_some() {
            return Err(Error::JoinStateError("join_2 called twice".to_owned()));
        }

        let h = self.params.generators();
        let blinded_commitment = h[1] * pending.s_prime + h[2] * pending.t + h[3] * pending.x;
        let pseudonym = self.params.pseudonym_base() * pending.x;

        let statements = [
            commitment_statement(&self.params, blinded_commitment),
            pseudonym_statement(&self.params, pseudonym),
        ];
        let context = join_context::<B>(JOIN_REGISTER_LABEL, &pending.holder_id, &pending.nonce);
        let proof = schnorr::prove(&statements, &pending.witnesses(), &context, rng)?;

        pending.s_issuer = Some(s_issuer);
        log::debug!("{} sent registration entry", pending.holder_id);

        Ok((
            RegistrationEntry {
                holder_id: pending.holder_id.clone(),
                pseudonym,
            },
            proof,
        ))
    }

    /// Third holder move: unblind and check the issued credential. The pending join is
    /// consumed whether or not the check passes.
    pub fn join_3(&mut self, response: &JoinResponse<B>, issuer_pk: &PublicKey<B>) -> Result<&Credential<B>, Error> {
        match &self.pending {
            Some(PendingJoin { s_issuer: Some(_), .. }) => {}
            Some(_) => return Err(Error::JoinStateError("join_3 before join_2".to_owned())),
            None => return Err(Error::JoinStateError("join_3 before join_1".to_owned())),
        }
        let pending = self
            .pending
            .take()
            .ok_or_else(|| Error::JoinStateError("join_3 before join_1".to_owned()))?;

        if pending.s_issuer != Some(response.s_issuer) {
            log::warn!("issuer share mismatch for {}", pending.holder_id);
            return Err(Error::InvalidCredential);
        }

        let credential = Credential {
            secret: HolderSecret {
                a: response.a,
                s: pending.s_prime + response.s_issuer,
                t: pending.t,
                x: pending.x,
            },
            e: response.e,
            index: response.index,
        };

        credential
            .signature()
            .verify(&self.params, issuer_pk, &credential.messages())
            .map_err(|_| {
                log::warn!("issued credential for {} does not verify", pending.holder_id);
                Error::InvalidCredential
            })?;

        log::info!("{} accepted credential {}", pending.holder_id, response.index);
        Ok(self.credential.insert(credential))
    }
}
