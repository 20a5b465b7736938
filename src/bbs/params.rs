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

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::{backend::PairingBackend, errors::Error, utils::util::i2osp};

/// Upper bound on the message count a parameter set can be generated for.
pub const MAX_SUPPORTED_MESSAGES: usize = 65535;

/// Public parameters: the generator vector `h[0..=n+1]` and the pseudonym base `u[0]`.
///
/// `h[0]` is the constant (blinding) base of every commitment, `h[i+1]` the base of the
/// i-th message. Parameters are derived from public seeds only, so any party can
/// re-derive them and compare.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Params<B: PairingBackend> {
    generators: Vec<B::G1>,
    pseudonym_base: B::G1,
    max_messages: usize,
}

impl<B: PairingBackend> Serialize for Params<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let result: Vec<String> = self
            .generators
            .iter()
            .map(|item| hex::encode(B::g1_to_bytes(item)))
            .collect();

        let mut state = serializer.serialize_struct("Params", 3)?;
        state.serialize_field("MaxMessages", &self.max_messages)?;
        state.serialize_field("Generators", &result)?;
        state.serialize_field("U0", &hex::encode(B::g1_to_bytes(&self.pseudonym_base)))?;
        state.end()
    }
}

impl<B: PairingBackend> Params<B> {
    /// Derive `max_messages + 2` generators by hashing consecutive indexes under the
    /// backend's generator seed, plus a pseudonym base under a distinct seed.
    pub fn generate(max_messages: usize) -> Result<Self, Error> {
        if max_messages > MAX_SUPPORTED_MESSAGES {
            return Err(Error::InvalidArgument(format!(
                "max_messages > {}",
                MAX_SUPPORTED_MESSAGES
            )));
        }

        let dst = B::generator_dst();
        let generators = (0..max_messages + 2)
            .map(|i| B::hash_to_g1(&[B::GENERATOR_SEED, &i2osp(i, 8)].concat(), &dst))
            .collect::<Result<Vec<B::G1>, Error>>()?;
        let pseudonym_base = B::hash_to_g1(&[B::PSEUDONYM_SEED, &i2osp(0, 8)].concat(), &dst)?;

        log::debug!("generated {} generators", max_messages + 2);

        Ok(Self {
            generators,
            pseudonym_base,
            max_messages,
        })
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// The full generator vector `h`.
    pub fn generators(&self) -> &[B::G1] {
        &self.generators
    }

    /// `h[0]`
    pub fn blinding_base(&self) -> B::G1 {
        self.generators[0]
    }

    /// Base of the message at position `index` (`h[index + 1]`).
    pub fn message_generator(&self, index: usize) -> Result<B::G1, Error> {
        if index >= self.max_messages {
            return Err(Error::OutOfRange {
                len: index + 1,
                max: self.max_messages,
            });
        }
        Ok(self.generators[index + 1])
    }

    pub fn pseudonym_base(&self) -> B::G1 {
        self.pseudonym_base
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = i2osp(self.max_messages, 8);
        self.generators
            .iter()
            .for_each(|g| bytes.extend_from_slice(&B::g1_to_bytes(g)));
        bytes.extend_from_slice(&B::g1_to_bytes(&self.pseudonym_base));
        bytes
    }
}

#[cfg(test)]
mod tests {
    use group::Group;

    use super::*;
    use crate::backend::toy::ModularToy;

    #[test]
    fn generation_is_deterministic() {
        let p1 = Params::<ModularToy>::generate(4).unwrap();
        let p2 = Params::<ModularToy>::generate(4).unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.to_bytes(), p2.to_bytes());
        assert_eq!(p1.generators().len(), 6);
    }

    #[test]
    fn smaller_sets_are_prefixes() {
        let small = Params::<ModularToy>::generate(2).unwrap();
        let large = Params::<ModularToy>::generate(10).unwrap();
        assert_eq!(small.generators(), &large.generators()[..4]);
        assert_eq!(small.pseudonym_base(), large.pseudonym_base());
    }

    #[test]
    fn generators_are_distinct_and_not_identity() {
        let params = Params::<ModularToy>::generate(8).unwrap();
        let gens = params.generators();
        for (i, g) in gens.iter().enumerate() {
            assert!(!bool::from(g.is_identity()));
            assert!(!gens[i + 1..].contains(g));
            assert_ne!(*g, params.pseudonym_base());
        }
    }

    #[test]
    fn zero_messages_still_yields_two_generators() {
        let params = Params::<ModularToy>::generate(0).unwrap();
        assert_eq!(params.generators().len(), 2);
        assert!(params.message_generator(0).is_err());
    }

    #[test]
    fn oversized_request_is_rejected() {
        assert!(matches!(
            Params::<ModularToy>::generate(MAX_SUPPORTED_MESSAGES + 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn serializes_as_hex() {
        let params = Params::<ModularToy>::generate(1).unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["MaxMessages"], 1);
        assert_eq!(json["Generators"].as_array().unwrap().len(), 3);
        assert_eq!(
            json["U0"].as_str().unwrap(),
            hex::encode(ModularToy::g1_to_bytes(&params.pseudonym_base()))
        );
    }
}
