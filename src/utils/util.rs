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

use bls12_381_plus::Scalar;
use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use ff::{Field, PrimeField};
use rand::{CryptoRng, RngCore};

use crate::errors::Error;

/// Output length of `expand_message` when mapping to a BLS12-381 scalar.
pub(crate) const EXPAND_LEN: usize = 48;

pub(crate) fn i2osp(value: usize, len: usize) -> Vec<u8> {
    let bytes = (value as u64).to_be_bytes();
    let len = len.min(bytes.len());
    bytes[bytes.len() - len..].to_vec()
}

/// Hash octets to a non-zero BLS12-381 scalar, re-hashing with an incremented counter byte
/// until the result is non-zero.
pub(crate) fn expand_to_scalar<X>(msg_octets: &[u8], dst: &[u8]) -> Result<Scalar, Error>
where
    X: for<'a> ExpandMsg<'a>,
{
    if dst.is_empty() {
        return Err(Error::HashToScalarError);
    }

    let mut counter: u8 = 0;
    let mut uniform_bytes = [0u8; EXPAND_LEN];

    loop {
        let msg_prime = [msg_octets, &[counter]].concat();
        X::expand_message(&[msg_prime.as_slice()], &[dst], EXPAND_LEN)
            .map_err(|_| Error::HashToScalarError)?
            .fill_bytes(&mut uniform_bytes);
        let hashed_scalar = Scalar::from_okm(&uniform_bytes);

        if !bool::from(hashed_scalar.is_zero()) {
            return Ok(hashed_scalar);
        }
        counter = counter.checked_add(1).ok_or(Error::HashToScalarError)?;
    }
}

pub(crate) fn scalar_len<S: PrimeField>() -> usize {
    S::Repr::default().as_ref().len()
}

pub(crate) fn scalar_to_bytes<S: PrimeField>(s: &S) -> Vec<u8> {
    s.to_repr().as_ref().to_vec()
}

pub(crate) fn scalar_from_bytes<S: PrimeField>(bytes: &[u8]) -> Result<S, Error> {
    let mut repr = S::Repr::default();
    if repr.as_ref().len() != bytes.len() {
        return Err(Error::DeserializationError("invalid scalar length".to_owned()));
    }
    repr.as_mut().copy_from_slice(bytes);
    let scalar: S = Option::from(S::from_repr(repr))
        .ok_or_else(|| Error::DeserializationError("invalid scalar".to_owned()))?;
    // from_repr may reduce values >= p instead of rejecting them
    if scalar.to_repr().as_ref() != bytes {
        return Err(Error::DeserializationError("non canonical scalar".to_owned()));
    }
    Ok(scalar)
}

pub(crate) fn calculate_random_scalars<S, R>(count: usize, rng: &mut R) -> Vec<S>
where
    S: Field,
    R: RngCore + CryptoRng,
{
    (0..count).map(|_| S::random(&mut *rng)).collect()
}

/// Uniform scalar in `[1, p-1]`.
pub(crate) fn random_nonzero_scalar<S, R>(rng: &mut R) -> S
where
    S: Field,
    R: RngCore + CryptoRng,
{
    loop {
        let s = S::random(&mut *rng);
        if !bool::from(s.is_zero()) {
            return s;
        }
    }
}

pub(crate) fn get_remaining_indexes(length: usize, indexes: &[usize]) -> Vec<usize> {
    (0..length).filter(|i| !indexes.contains(i)).collect()
}

pub(crate) fn get_messages<S: Copy>(messages: &[S], indexes: &[usize]) -> Vec<S> {
    indexes.iter().map(|&i| messages[i]).collect()
}

/// Sort and validate a set of disclosed positions for a vector of `length` messages.
pub(crate) fn normalize_indexes(length: usize, indexes: &[usize]) -> Result<Vec<usize>, Error> {
    let mut sorted = indexes.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(Error::InvalidArgument("duplicate disclosed index".to_owned()));
    }
    if let Some(&invalid) = sorted.iter().find(|&&i| i >= length) {
        return Err(Error::InvalidArgument(format!("invalid disclosed index: {}", invalid)));
    }
    Ok(sorted)
}


/// Adds the BLS12-381 scalar modulus to an encoded scalar, in the encoding's byte order.
#[cfg(test)]
pub(crate) fn add_modulus(encoded: &[u8]) -> Vec<u8> {
    const MODULUS_BE: [u8; 32] = [
        0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
        0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
    ];
    let little_endian = scalar_to_bytes(&Scalar::ONE)[0] == 1;

    let mut value: Vec<u8> = encoded.to_vec();
    if little_endian {
        value.reverse();
    }
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = value[i] as u16 + MODULUS_BE[i] as u16 + carry;
        value[i] = sum as u8;
        carry = sum >> 8;
    }
    if little_endian {
        value.reverse();
    }
    value
}
