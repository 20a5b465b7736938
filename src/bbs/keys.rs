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

use core::fmt;

use group::Group;
use rand::{CryptoRng, RngCore};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::{backend::PairingBackend, errors::Error, utils::util::random_nonzero_scalar};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKey<B: PairingBackend>(pub(crate) B::G2);

impl<B: PairingBackend> PublicKey<B> {
    pub fn point(&self) -> B::G2 {
        self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        B::g2_to_bytes(&self.0)
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let pk = B::g2_from_bytes(bytes)?;
        if bool::from(pk.is_identity()) {
            return Err(Error::DeserializationError("identity public key".to_owned()));
        }
        Ok(Self(pk))
    }
}

impl<B: PairingBackend> Serialize for PublicKey<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for PublicKey<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(encoded).map_err(D::Error::custom)?;
        Self::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

/// The issuer's signing key. Never serialized and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey<B: PairingBackend>(pub(crate) B::Scalar);

impl<B: PairingBackend> fmt::Debug for SecretKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyPair<B: PairingBackend> {
    pub(crate) public: PublicKey<B>,
    pub(crate) private: SecretKey<B>,
}

impl<B: PairingBackend> KeyPair<B> {
    /// Draw `sk` uniformly from `[1, p-1]` and set `pk = sk·G2`.
    ///
    /// Independent issuers must use independent key pairs; nothing here checks for reuse.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let sk: B::Scalar = random_nonzero_scalar(rng);
        let pk = sk_to_pk::<B>(&sk);
        Self {
            public: PublicKey(pk),
            private: SecretKey(sk),
        }
    }

    pub fn public_key(&self) -> &PublicKey<B> {
        &self.public
    }

    pub(crate) fn private_key(&self) -> &SecretKey<B> {
        &self.private
    }
}

pub(crate) fn sk_to_pk<B: PairingBackend>(sk: &B::Scalar) -> B::G2 {
    B::G2::generator() * sk
}
