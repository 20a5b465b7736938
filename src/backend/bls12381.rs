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

use bls12_381_plus::{multi_miller_loop, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar};
use elliptic_curve::hash2curve::{ExpandMsgXmd, ExpandMsgXof};
use group::Curve;
use sha2::Sha256;
use sha3::Shake256;

use super::PairingBackend;
use crate::{errors::Error, utils::util::expand_to_scalar};

/// BLS12-381 with `expand_message_xmd` over SHA-256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bls12381Sha256;

/// BLS12-381 with `expand_message_xof` over SHAKE-256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bls12381Shake256;

impl PairingBackend for Bls12381Sha256 {
    type Scalar = Scalar;
    type G1 = G1Projective;
    type G2 = G2Projective;
    type Gt = Gt;

    const ID: &'static [u8] = b"BBSGS_BLS12381G1_XMD:SHA-256_SSWU_RO_";
    const GENERATOR_SEED: &'static [u8] = b"BBSGS_BLS12381G1_XMD:SHA-256_SSWU_RO_MESSAGE_GENERATOR_SEED";
    const PSEUDONYM_SEED: &'static [u8] = b"BBSGS_BLS12381G1_XMD:SHA-256_SSWU_RO_PSEUDONYM_GENERATOR_SEED";
    const G1_BYTES: usize = G1Affine::COMPRESSED_BYTES;
    const G2_BYTES: usize = G2Affine::COMPRESSED_BYTES;

    fn pairing(p: &G1Projective, q: &G2Projective) -> Gt {
        bls_pairing(p, q)
    }

    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<G1Projective, Error> {
        Ok(G1Projective::hash::<ExpandMsgXmd<Sha256>>(msg, dst))
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
        expand_to_scalar::<ExpandMsgXmd<Sha256>>(msg, dst)
    }

    fn g1_to_bytes(p: &G1Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g1_from_bytes(bytes: &[u8]) -> Result<G1Projective, Error> {
        parse_g1_projective(bytes)
    }

    fn g2_to_bytes(p: &G2Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g2_from_bytes(bytes: &[u8]) -> Result<G2Projective, Error> {
        parse_g2_projective(bytes)
    }
}

impl PairingBackend for Bls12381Shake256 {
    type Scalar = Scalar;
    type G1 = G1Projective;
    type G2 = G2Projective;
    type Gt = Gt;

    const ID: &'static [u8] = b"BBSGS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_";
    const GENERATOR_SEED: &'static [u8] = b"BBSGS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_MESSAGE_GENERATOR_SEED";
    const PSEUDONYM_SEED: &'static [u8] = b"BBSGS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_PSEUDONYM_GENERATOR_SEED";
    const G1_BYTES: usize = G1Affine::COMPRESSED_BYTES;
    const G2_BYTES: usize = G2Affine::COMPRESSED_BYTES;

    fn pairing(p: &G1Projective, q: &G2Projective) -> Gt {
        bls_pairing(p, q)
    }

    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<G1Projective, Error> {
        Ok(G1Projective::hash::<ExpandMsgXof<Shake256>>(msg, dst))
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
        expand_to_scalar::<ExpandMsgXof<Shake256>>(msg, dst)
    }

    fn g1_to_bytes(p: &G1Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g1_from_bytes(bytes: &[u8]) -> Result<G1Projective, Error> {
        parse_g1_projective(bytes)
    }

    fn g2_to_bytes(p: &G2Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g2_from_bytes(bytes: &[u8]) -> Result<G2Projective, Error> {
        parse_g2_projective(bytes)
    }
}

fn bls_pairing(p: &G1Projective, q: &G2Projective) -> Gt {
    let term = (&p.to_affine(), &G2Prepared::from(q.to_affine()));
    multi_miller_loop(&[term]).final_exponentiation()
}

fn parse_g1_projective(bytes: &[u8]) -> Result<G1Projective, Error> {
    let bytes: [u8; G1Affine::COMPRESSED_BYTES] = bytes
        .try_into()
        .map_err(|_| Error::DeserializationError("invalid G1 point length".to_owned()))?;
    Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
        .map(G1Projective::from)
        .ok_or_else(|| Error::DeserializationError("invalid G1 point".to_owned()))
}

fn parse_g2_projective(bytes: &[u8]) -> Result<G2Projective, Error> {
    let bytes: [u8; G2Affine::COMPRESSED_BYTES] = bytes
        .try_into()
        .map_err(|_| Error::DeserializationError("invalid G2 point length".to_owned()))?;
    Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
        .map(G2Projective::from)
        .ok_or_else(|| Error::DeserializationError("invalid G2 point".to_owned()))
}

#[cfg(test)]
mod tests {
    use group::Group;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::utils::util::random_nonzero_scalar;

    #[test]
    fn pairing_is_bilinear() {
        let mut rng = StdRng::seed_from_u64(7);
        let a: Scalar = random_nonzero_scalar(&mut rng);
        let b: Scalar = random_nonzero_scalar(&mut rng);
        let p = <G1Projective as Group>::generator();
        let q = <G2Projective as Group>::generator();

        let lhs = Bls12381Sha256::pairing(&(p * a), &(q * b));
        let rhs = Bls12381Sha256::pairing(&(p * (a * b)), &q);
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, Bls12381Sha256::pairing(&p, &q));
    }

    #[test]
    fn hash_to_g1_depends_on_suite() {
        let dst = b"TEST_DST_";
        let p1 = Bls12381Sha256::hash_to_g1(b"message", dst).unwrap();
        let p2 = Bls12381Shake256::hash_to_g1(b"message", dst).unwrap();
        assert_eq!(p1, Bls12381Sha256::hash_to_g1(b"message", dst).unwrap());
        assert_ne!(p1, p2);
    }

    #[test]
    fn g2_encoding_rejects_garbage() {
        let q = <G2Projective as Group>::generator();
        let bytes = Bls12381Sha256::g2_to_bytes(&q);
        assert_eq!(bytes.len(), Bls12381Sha256::G2_BYTES);
        assert_eq!(Bls12381Sha256::g2_from_bytes(&bytes), Ok(q));
        assert!(Bls12381Sha256::g2_from_bytes(&[0xffu8; 96]).is_err());
        assert!(Bls12381Sha256::g2_from_bytes(&bytes[1..]).is_err());
    }
}
