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

use crate::{backend::PairingBackend, errors::Error};

/// Map an arbitrary octet string to a message scalar.
///
/// Attributes that already are field elements (counters, dates, small integers) can be
/// signed directly with `B::Scalar::from(u64)`; everything else goes through this hash.
pub fn map_message_to_scalar<B: PairingBackend>(data: &[u8]) -> Result<B::Scalar, Error> {
    B::hash_to_scalar(data, &B::map_msg_dst())
}

pub fn messages_to_scalars<B: PairingBackend>(messages: &[Vec<u8>]) -> Result<Vec<B::Scalar>, Error> {
    messages
        .iter()
        .map(|m| map_message_to_scalar::<B>(m))
        .collect()
}
