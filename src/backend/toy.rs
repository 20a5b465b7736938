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

//! A deliberately insecure backend where every group is the additive group of the
//! BLS12-381 scalar field and the pairing is field multiplication.
//!
//! `e(a·P, b·Q) = a·b·P·Q = e(P, Q)·a·b`, so every protocol equation holds exactly as on a
//! real curve, but discrete logarithms are trivial. Use it for fast statistical tests and
//! for reasoning about the algebra, never to protect anything.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bls12_381_plus::Scalar;
use elliptic_curve::hash2curve::ExpandMsgXmd;
use elliptic_curve::subtle::Choice;
use ff::Field;
use group::Group;
use rand::RngCore;
use sha2::Sha256;

use super::PairingBackend;
use crate::{
    errors::Error,
    utils::util::{expand_to_scalar, scalar_from_bytes, scalar_to_bytes},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModularToy;

/// An element of `Z_p` viewed as a group element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToyElement(pub Scalar);

impl PairingBackend for ModularToy {
    type Scalar = Scalar;
    type G1 = ToyElement;
    type G2 = ToyElement;
    type Gt = ToyElement;

    const ID: &'static [u8] = b"BBSGS_TOY_ZP_XMD:SHA-256_";
    const GENERATOR_SEED: &'static [u8] = b"BBSGS_TOY_ZP_XMD:SHA-256_MESSAGE_GENERATOR_SEED";
    const PSEUDONYM_SEED: &'static [u8] = b"BBSGS_TOY_ZP_XMD:SHA-256_PSEUDONYM_GENERATOR_SEED";
    const G1_BYTES: usize = 32;
    const G2_BYTES: usize = 32;

    fn pairing(p: &ToyElement, q: &ToyElement) -> ToyElement {
        ToyElement(p.0 * q.0)
    }

    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<ToyElement, Error> {
        expand_to_scalar::<ExpandMsgXmd<Sha256>>(msg, dst).map(ToyElement)
    }

    fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
        expand_to_scalar::<ExpandMsgXmd<Sha256>>(msg, dst)
    }

    fn g1_to_bytes(p: &ToyElement) -> Vec<u8> {
        scalar_to_bytes(&p.0)
    }

    fn g1_from_bytes(bytes: &[u8]) -> Result<ToyElement, Error> {
        scalar_from_bytes(bytes).map(ToyElement)
    }

    fn g2_to_bytes(p: &ToyElement) -> Vec<u8> {
        scalar_to_bytes(&p.0)
    }

    fn g2_from_bytes(bytes: &[u8]) -> Result<ToyElement, Error> {
        scalar_from_bytes(bytes).map(ToyElement)
    }
}

impl Group for ToyElement {
    type Scalar = Scalar;

    fn random(rng: impl RngCore) -> Self {
        Self(Scalar::random(rng))
    }

    fn identity() -> Self {
        Self(Scalar::ZERO)
    }

    fn generator() -> Self {
        Self(Scalar::ONE)
    }

    fn is_identity(&self) -> Choice {
        self.0.is_zero()
    }

    fn double(&self) -> Self {
        Self(self.0.double())
    }
}

impl Neg for ToyElement {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Add for ToyElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a ToyElement> for ToyElement {
    type Output = Self;
    fn add(self, rhs: &'a ToyElement) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for ToyElement {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a ToyElement> for ToyElement {
    type Output = Self;
    fn sub(self, rhs: &'a ToyElement) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for ToyElement {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl<'a> AddAssign<&'a ToyElement> for ToyElement {
    fn add_assign(&mut self, rhs: &'a ToyElement) {
        self.0 += rhs.0;
    }
}

impl SubAssign for ToyElement {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl<'a> SubAssign<&'a ToyElement> for ToyElement {
    fn sub_assign(&mut self, rhs: &'a ToyElement) {
        self.0 -= rhs.0;
    }
}

impl Mul<Scalar> for ToyElement {
    type Output = Self;
    fn mul(self, rhs: Scalar) -> Self {
        Self(self.0 * rhs)
    }
}

impl<'a> Mul<&'a Scalar> for ToyElement {
    type Output = Self;
    fn mul(self, rhs: &'a Scalar) -> Self {
        Self(self.0 * rhs)
    }
}

impl MulAssign<Scalar> for ToyElement {
    fn mul_assign(&mut self, rhs: Scalar) {
        self.0 *= rhs;
    }
}

impl<'a> MulAssign<&'a Scalar> for ToyElement {
    fn mul_assign(&mut self, rhs: &'a Scalar) {
        self.0 *= rhs;
    }
}

impl Sum for ToyElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a ToyElement> for ToyElement {
    fn sum<I: Iterator<Item = &'a ToyElement>>(iter: I) -> Self {
        iter.fold(Self::identity(), |acc, x| acc + x)
    }
}
