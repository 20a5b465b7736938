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

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{len} messages requested but the parameters support at most {max}")]
    OutOfRange { len: usize, max: usize },
    /// No `e` with `e + sk` invertible was found. Expected probability is ~1/p per
    /// attempt, so this points at a misconfigured backend rather than bad luck.
    #[error("No invertible salt found after {0} attempts")]
    RetryExhausted(usize),
    #[error("Issued credential failed the holder consistency check")]
    InvalidCredential,
    #[error("Signature is not valid")]
    SignatureVerificationError,
    #[error("Signature proof of knowledge rejected: {0}")]
    ProofRejected(String),
    /// Internal consistency check failed. Indicates a backend bug, never a user error.
    #[error("Algebraic invariant violated: {0}")]
    AlgebraicInvariantViolation(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Error during deserialization: {0}")]
    DeserializationError(String),

    #[error("Invalid commitment proof")]
    InvalidCommitmentProof,
    #[error("A join is already in progress for holder {0}")]
    JoinInProgress(String),
    #[error("No join session for holder {0}")]
    UnknownJoinSession(String),
    #[error("Join step out of order: {0}")]
    JoinStateError(String),
    #[error("Holder {0} is already registered")]
    AlreadyRegistered(String),
}
