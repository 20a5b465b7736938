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

use std::collections::HashMap;
use std::sync::Arc;

use ff::Field;
use group::Group;
use parking_lot::Mutex;
use rand::{CryptoRng, RngCore};

use super::join::{
    check_join_params, commitment_statement, join_context, pseudonym_statement, JoinRequest, JoinResponse,
    JoinTicket, Registration, RegistrationEntry, JOIN_COMMIT_LABEL, JOIN_REGISTER_LABEL,
};
use crate::{
    backend::PairingBackend,
    bbs::{
        commitment::Commitment,
        keys::{KeyPair, PublicKey},
        params::Params,
        schnorr::{self, ZkPoK},
        signature::{core_sign, invertible_salt, Signature},
    },
    errors::Error,
};

enum JoinState<B: PairingBackend> {
    Opened { nonce: B::Scalar },
    Committed {
        nonce: B::Scalar,
        blinded: B::G1,
        s_issuer: B::Scalar,
    },
    Finalizing,
}

/// The group manager: owns the signing key, runs the issuer side of the join protocol and
/// keeps the registration log.
///
/// All methods take `&self`; an `Issuer` can be shared between threads serving different
/// holders. Each holder id has at most one join in flight. The session table and the
/// registration log sit behind separate mutexes and are never locked together.
pub struct Issuer<B: PairingBackend> {
    params: Arc<Params<B>>,
    keypair: KeyPair<B>,
    sessions: Mutex<HashMap<String, JoinState<B>>>,
    registry: Mutex<Vec<Registration<B>>>,
}

impl<B: PairingBackend> Issuer<B> {
    /// Create an issuer with a freshly generated key pair.
    pub fn new<R: RngCore + CryptoRng>(params: Arc<Params<B>>, rng: &mut R) -> Self {
        let keypair = KeyPair::generate(rng);
        log::info!("issuer key generated, pk = {}", keypair.public_key().encode());
        Self {
            params,
            keypair,
            sessions: Mutex::new(HashMap::new()),
            registry: Mutex::new(Vec::new()),
        }
    }

    pub fn params(&self) -> &Arc<Params<B>> {
        &self.params
    }

    pub fn public_key(&self) -> &PublicKey<B> {
        self.keypair.public_key()
    }

    pub fn sign<R>(&self, commitment: &Commitment<B>, rng: &mut R) -> Result<Signature<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        Signature::sign(self.keypair.private_key(), commitment, rng)
    }

    pub fn sign_messages<R>(&self, messages: &[B::Scalar], rng: &mut R) -> Result<Signature<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        let commitment = Commitment::commit(&self.params, messages)?;
        self.sign(&commitment, rng)
    }

    pub fn verify(&self, signature: &Signature<B>, messages: &[B::Scalar]) -> Result<(), Error> {
        signature.verify(&self.params, self.public_key(), messages)
    }

    /// Index the next registration will receive if no other join completes first.
    pub fn next_index(&self) -> u64 {
        self.registry.lock().len() as u64
    }

    pub fn registrations(&self) -> Vec<Registration<B>> {
        self.registry.lock().clone()
    }

    pub fn registration(&self, index: u64) -> Option<Registration<B>> {
        self.registry.lock().get(index as usize).cloned()
    }

    pub fn pending_joins(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Drop the in-flight join of `holder_id`. Returns whether one existed.
    pub fn abort_join(&self, holder_id: &str) -> bool {
        let removed = self.sessions.lock().remove(holder_id).is_some();
        if removed {
            log::debug!("join session for {} aborted", holder_id);
        }
        removed
    }

    /// First issuer move: open a session for `holder_id`.
    pub fn join_1<R>(&self, holder_id: &str, rng: &mut R) -> Result<JoinTicket<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        check_join_params(&self.params)?;

        let index = {
            let registry = self.registry.lock();
            if registry.iter().any(|r| r.entry.holder_id == holder_id) {
                return Err(Error::AlreadyRegistered(holder_id.to_owned()));
            }
            registry.len() as u64
        };

        let nonce = B::Scalar::random(&mut *rng);
        {
            let mut sessions = self.sessions.lock();
            if sessions.contains_key(holder_id) {
                log::warn!("rejecting overlapping join for {}", holder_id);
                return Err(Error::JoinInProgress(holder_id.to_owned()));
            }
            sessions.insert(holder_id.to_owned(), JoinState::Opened { nonce });
        }

        log::debug!("join session opened for {}, provisional index {}", holder_id, index);
        Ok(JoinTicket { index, nonce })
    }

    /// Second issuer move: check the holder's opening proof for `C'` and return the issuer's
    /// share `s''`.
    pub fn join_2<R>(&self, holder_id: &str, request: &JoinRequest<B>, rng: &mut R) -> Result<B::Scalar, Error>
    where
        R: RngCore + CryptoRng,
    {
        let nonce = match self.sessions.lock().get(holder_id) {
            Some(JoinState::Opened { nonce }) => *nonce,
            Some(_) => return Err(Error::JoinStateError("join_2 called twice".to_owned())),
            None => return Err(Error::UnknownJoinSession(holder_id.to_owned())),
        };

        let statement = [commitment_statement(&self.params, request.blinded_commitment)];
        let context = join_context::<B>(JOIN_COMMIT_LABEL, holder_id, &nonce);
        if let Err(e) = schnorr::verify(&statement, &request.proof, &context) {
            log::warn!("invalid commitment proof from {}", holder_id);
            let mut sessions = self.sessions.lock();
            if matches!(sessions.get(holder_id), Some(JoinState::Opened { nonce: n }) if *n == nonce) {
                sessions.remove(holder_id);
            }
            return Err(e);
        }

        let s_issuer = B::Scalar::random(&mut *rng);
        self.commit_session(holder_id, nonce, request.blinded_commitment, s_issuer)?;

        log::debug!("join session for {} committed", holder_id);
        Ok(s_issuer)
    }

    /// Move the session opened with `nonce` to `Committed`. A session that was aborted and
    /// reopened in the meantime carries a different nonce and is left untouched.
    fn commit_session(&self, holder_id: &str, nonce: B::Scalar, blinded: B::G1, s_issuer: B::Scalar) -> Result<(), Error> {
        let mut sessions = self.sessions.lock();
        let state = sessions
            .get_mut(holder_id)
            .ok_or_else(|| Error::UnknownJoinSession(holder_id.to_owned()))?;
        match *state {
            JoinState::Opened { nonce: n } if n == nonce => {}
            JoinState::Opened { .. } => return Err(Error::JoinStateError("join session was reopened".to_owned())),
            _ => return Err(Error::JoinStateError("join_2 called twice".to_owned())),
        }
        *state = JoinState::Committed {
            nonce,
            blinded,
            s_issuer,
        };
        Ok(())
    }

    /// Append a registration. The duplicate check and the index assignment happen under the
    /// same lock.
    fn append_registration(&self, entry: &RegistrationEntry<B>, e: B::Scalar) -> Result<u64, Error> {
        let mut registry = self.registry.lock();
        if registry.iter().any(|r| r.entry.holder_id == entry.holder_id) {
            return Err(Error::AlreadyRegistered(entry.holder_id.clone()));
        }
        let index = registry.len() as u64;
        registry.push(Registration {
            index,
            entry: entry.clone(),
            e,
        });
        Ok(index)
    }

    /// Third issuer move: check the pseudonym proof, sign `h0 + C' + s''·h1` and append the
    /// registration. The session is closed whatever the outcome.
    pub fn join_3<R>(
        &self,
        holder_id: &str,
        entry: &RegistrationEntry<B>,
        proof: &ZkPoK<B>,
        rng: &mut R,
    ) -> Result<JoinResponse<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        let (nonce, blinded, s_issuer) = {
            let mut sessions = self.sessions.lock();
            let state = sessions
                .get_mut(holder_id)
                .ok_or_else(|| Error::UnknownJoinSession(holder_id.to_owned()))?;
            match std::mem::replace(state, JoinState::Finalizing) {
                JoinState::Committed {
                    nonce,
                    blinded,
                    s_issuer,
                } => (nonce, blinded, s_issuer),
                previous => {
                    let finalizing = matches!(previous, JoinState::Finalizing);
                    *state = previous;
                    return Err(Error::JoinStateError(if finalizing {
                        "join_3 already running".to_owned()
                    } else {
                        "join_3 before join_2".to_owned()
                    }));
                }
            }
        };

        let result = self.finalize_join(holder_id, entry, proof, nonce, blinded, s_issuer, rng);
        self.sessions.lock().remove(holder_id);

        match &result {
            Ok(response) => log::info!("holder {} registered at index {}", holder_id, response.index),
            Err(e) => log::warn!("join for {} failed: {}", holder_id, e),
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn finalize_join<R>(
        &self,
        holder_id: &str,
        entry: &RegistrationEntry<B>,
        proof: &ZkPoK<B>,
        nonce: B::Scalar,
        blinded: B::G1,
        s_issuer: B::Scalar,
        rng: &mut R,
    ) -> Result<JoinResponse<B>, Error>
    where
        R: RngCore + CryptoRng,
    {
        if entry.holder_id != holder_id {
            return Err(Error::InvalidArgument("registration entry for another holder".to_owned()));
        }
        if bool::from(entry.pseudonym.is_identity()) {
            return Err(Error::InvalidArgument("identity pseudonym".to_owned()));
        }

        let statements = [
            commitment_statement(&self.params, blinded),
            pseudonym_statement(&self.params, entry.pseudonym),
        ];
        let context = join_context::<B>(JOIN_REGISTER_LABEL, holder_id, &nonce);
        schnorr::verify(&statements, proof, &context)?;

        let h = self.params.generators();
        let commitment = h[0] + blinded + h[1] * s_issuer;

        let sk = &self.keypair.private_key().0;
        let (e, inverse) = invertible_salt::<B, _>(sk, || B::Scalar::random(&mut *rng))?;
        let signature = core_sign::<B>(sk, commitment, e, inverse)?;

        let index = self.append_registration(entry, e)?;

        Ok(JoinResponse {
            index,
            a: signature.a,
            e,
            s_issuer,
        })
    }
}
