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

use ff::Field;
use group::Group;
use rand::{CryptoRng, RngCore};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use super::{
    commitment::{core_commit, Commitment},
    keys::{PublicKey, SecretKey},
    params::Params,
};
use crate::{
    backend::PairingBackend,
    errors::Error,
    utils::util::{scalar_from_bytes, scalar_len, scalar_to_bytes},
};

/// Maximum number of exponents drawn before signing gives up.
pub const RETRY_LIMIT: usize = 50;

/// A BBS signature `(A, e)` with `A·(e + sk) = C`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature<B: PairingBackend> {
    pub(crate) a: B::G1,
    pub(crate) e: B::Scalar,
}

impl<B: PairingBackend> Signature<B> {
    pub fn a(&self) -> B::G1 {
        self.a
    }

    pub fn e(&self) -> B::Scalar {
        self.e
    }

    pub fn byte_len() -> usize {
        B::G1_BYTES + scalar_len::<B::Scalar>()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = B::g1_to_bytes(&self.a);
        bytes.extend_from_slice(&scalar_to_bytes(&self.e));
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != Self::byte_len() {
            return Err(Error::DeserializationError("invalid signature length".to_owned()));
        }
        let a = B::g1_from_bytes(&data[..B::G1_BYTES])?;
        let e = scalar_from_bytes(&data[B::G1_BYTES..])?;
        Ok(Self { a, e })
    }

    /// Sign a commitment: `A = C·(e + sk)^-1` for a freshly sampled `e`.
    pub(crate) fn sign<R>(sk: &SecretKey<B>, commitment: &Commitment<B>, rng: &mut R) -> Result<Self, Error>
    where
        R: RngCore + CryptoRng,
    {
        let (e, inverse) = invertible_salt::<B, _>(&sk.0, || B::Scalar::random(&mut *rng))?;
        core_sign::<B>(&sk.0, commitment.point(), e, inverse)
    }

    /// Check `e(A, pk + e·G2) == e(C, G2)` with `C` the commitment to `messages`.
    pub fn verify(&self, params: &Params<B>, pk: &PublicKey<B>, messages: &[B::Scalar]) -> Result<(), Error> {
        let commitment = core_commit(params, messages)?;
        self.verify_commitment(pk, &commitment)
    }

    pub fn verify_commitment(&self, pk: &PublicKey<B>, commitment: &B::G1) -> Result<(), Error> {
        core_verify(pk, self, commitment)
    }
}

impl<B: PairingBackend> Serialize for Signature<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for Signature<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(encoded).map_err(D::Error::custom)?;
        Self::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

/// Rejection-sample an exponent `e` such that `e + sk` is invertible.
///
/// Returns `(e, (e + sk)^-1)`, or [`Error::RetryExhausted`] after [`RETRY_LIMIT`] draws.
pub(crate) fn invertible_salt<B, F>(sk: &B::Scalar, mut draw: F) -> Result<(B::Scalar, B::Scalar), Error>
where
    B: PairingBackend,
    F: FnMut() -> B::Scalar,
{
    for attempt in 1..=RETRY_LIMIT {
        let e = draw();
        if let Some(inverse) = Option::<B::Scalar>::from((e + sk).invert()) {
            return Ok((e, inverse));
        }
        log::warn!("salt attempt {}/{} not invertible", attempt, RETRY_LIMIT);
    }
    Err(Error::RetryExhausted(RETRY_LIMIT))
}

pub(crate) fn core_sign<B: PairingBackend>(
    sk: &B::Scalar,
    commitment: B::G1,
    e: B::Scalar,
    inverse: B::Scalar,
) -> Result<Signature<B>, Error> {
    let a = commitment * inverse;

    if commitment != a * (e + sk) {
        log::error!("signing invariant C == A·(e + sk) does not hold");
        return Err(Error::AlgebraicInvariantViolation("C != A·(e + sk)".to_owned()));
    }

    Ok(Signature { a, e })
}

fn core_verify<B: PairingBackend>(pk: &PublicKey<B>, signature: &Signature<B>, commitment: &B::G1) -> Result<(), Error> {
    if bool::from(signature.a.is_identity()) {
        return Err(Error::SignatureVerificationError);
    }

    let BP2 = B::G2::generator();
    let A2 = pk.0 + BP2 * signature.e;

    if B::pairing(&signature.a, &A2) == B::pairing(commitment, &BP2) {
        Ok(())
    } else {
        Err(Error::SignatureVerificationError)
    }
}

#[cfg(test)]
mod tests {
    use bls12_381_plus::Scalar;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{backend::toy::ModularToy, bbs::keys::KeyPair, utils::util::add_modulus};

    fn scalars(values: &[u64]) -> Vec<Scalar> {
        values.iter().map(|&v| Scalar::from(v)).collect()
    }

    #[test]
    fn sign_then_verify() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = Params::<ModularToy>::generate(4).unwrap();
        let kp = KeyPair::<ModularToy>::generate(&mut rng);
        let messages = scalars(&[123, 124, 124152, 11]);

        let commitment = Commitment::commit(&params, &messages).unwrap();
        let signature = Signature::sign(kp.private_key(), &commitment, &mut rng).unwrap();

        assert!(signature.verify(&params, kp.public_key(), &messages).is_ok());
        assert_eq!(
            signature.verify(&params, kp.public_key(), &scalars(&[123, 124, 124152, 12])),
            Err(Error::SignatureVerificationError)
        );
    }

    #[test]
    fn non_invertible_salt_exhausts_retries() {
        let sk = Scalar::from(42u64);
        let mut draws = 0;
        let result = invertible_salt::<ModularToy, _>(&sk, || {
            draws += 1;
            -sk
        });
        assert_eq!(result, Err(Error::RetryExhausted(RETRY_LIMIT)));
        assert_eq!(draws, RETRY_LIMIT);
    }

    #[test]
    fn salt_sampling_recovers_after_a_bad_draw() {
        let sk = Scalar::from(42u64);
        let mut candidates = vec![Scalar::from(8u64), -sk].into_iter().rev();
        let (e, inverse) = invertible_salt::<ModularToy, _>(&sk, || candidates.next().unwrap()).unwrap();
        assert_eq!(e, Scalar::from(8u64));
        assert_eq!(inverse * Scalar::from(50u64), Scalar::ONE);
    }

    #[test]
    fn wrong_inverse_is_an_invariant_violation() {
        let params = Params::<ModularToy>::generate(1).unwrap();
        let sk = Scalar::from(5u64);
        let e = Scalar::from(6u64);
        let result = core_sign::<ModularToy>(&sk, params.blinding_base(), e, Scalar::from(2u64));
        assert!(matches!(result, Err(Error::AlgebraicInvariantViolation(_))));
    }

    #[test]
    fn signature_serde_round_trip() {
        let mut rng = StdRng::seed_from_u64(12);
        let params = Params::<ModularToy>::generate(2).unwrap();
        let kp = KeyPair::<ModularToy>::generate(&mut rng);
        let commitment = Commitment::commit(&params, &scalars(&[1, 2])).unwrap();
        let signature = Signature::sign(kp.private_key(), &commitment, &mut rng).unwrap();

        let json = serde_json::to_string(&signature).unwrap();
        let decoded: Signature<ModularToy> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, signature);
        assert!(Signature::<ModularToy>::from_bytes(&signature.to_bytes()[1..]).is_err());
    }

    #[test]
    fn exponent_plus_modulus_is_rejected() {
        let mut rng = StdRng::seed_from_u64(13);
        let params = Params::<ModularToy>::generate(2).unwrap();
        let kp = KeyPair::<ModularToy>::generate(&mut rng);
        let commitment = Commitment::commit(&params, &scalars(&[3, 4])).unwrap();
        let signature = Signature::sign(kp.private_key(), &commitment, &mut rng).unwrap();

        let mut bytes = signature.to_bytes();
        let e_offset = ModularToy::G1_BYTES;
        let shifted = add_modulus(&bytes[e_offset..]);
        bytes[e_offset..].copy_from_slice(&shifted);

        assert!(matches!(
            Signature::<ModularToy>::from_bytes(&bytes),
            Err(Error::DeserializationError(_))
        ));
    }
}
