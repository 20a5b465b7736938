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

use crate::{backend::PairingBackend, bbs::params::Params, errors::Error};

/// Pedersen vector commitment `C = h[0] + Σ m_i·h[i+1]`.
///
/// Binding under the discrete logarithm assumption. On its own it does not hide the
/// messages: blinding comes from an extra random message (see the join protocol).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Commitment<B: PairingBackend>(pub(crate) B::G1);

impl<B: PairingBackend> Commitment<B> {
    pub fn commit(params: &Params<B>, messages: &[B::Scalar]) -> Result<Self, Error> {
        Ok(Self(core_commit(params, messages)?))
    }

    pub fn from_point(point: B::G1) -> Self {
        Self(point)
    }

    pub fn point(&self) -> B::G1 {
        self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        B::g1_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(B::g1_from_bytes(bytes)?))
    }
}

pub(crate) fn core_commit<B: PairingBackend>(params: &Params<B>, messages: &[B::Scalar]) -> Result<B::G1, Error> {
    let L = messages.len();
    if L > params.max_messages() {
        return Err(Error::OutOfRange {
            len: L,
            max: params.max_messages(),
        });
    }

    let h = params.generators();
    let mut commitment = h[0];
    for i in 0..L {
        commitment += h[i + 1] * messages[i];
    }

    Ok(commitment)
}

#[cfg(test)]
mod tests {
    use bls12_381_plus::Scalar;

    use super::*;
    use crate::backend::toy::{ModularToy, ToyElement};

    #[test]
    fn empty_vector_commits_to_the_blinding_base() {
        let params = Params::<ModularToy>::generate(3).unwrap();
        let c = Commitment::commit(&params, &[]).unwrap();
        assert_eq!(c.point(), params.blinding_base());
    }

    #[test]
    fn commitment_is_linear_in_the_messages() {
        let params = Params::<ModularToy>::generate(2).unwrap();
        let h = params.generators();
        let m = [Scalar::from(5u64), Scalar::from(9u64)];
        let c = Commitment::commit(&params, &m).unwrap();
        let expected: ToyElement = h[0] + h[1] * m[0] + h[2] * m[1];
        assert_eq!(c.point(), expected);
    }

    #[test]
    fn too_many_messages_is_out_of_range() {
        let params = Params::<ModularToy>::generate(2).unwrap();
        let m = [Scalar::from(1u64); 3];
        assert_eq!(
            Commitment::commit(&params, &m),
            Err(Error::OutOfRange { len: 3, max: 2 })
        );
    }

    #[test]
    fn commitment_bytes_round_trip() {
        let params = Params::<ModularToy>::generate(2).unwrap();
        let c = Commitment::commit(&params, &[Scalar::from(77u64)]).unwrap();
        assert_eq!(Commitment::<ModularToy>::from_bytes(&c.to_bytes()), Ok(c));
    }
}
