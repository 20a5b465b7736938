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

//! Group membership on top of [`crate::bbs`].
//!
//! An [`issuer::Issuer`] admits members through a three-move join protocol. The member's
//! credential is a BBS signature on three secret messages `(s, t, x)`: `s` is split between
//! the two parties, so the issuer never learns it, and `x` is bound to a registered pseudonym
//! `x·u0`. A [`holder::Holder`] then proves membership with a signature proof that hides all
//! three messages.

pub mod join;
pub mod issuer;
pub mod holder;
