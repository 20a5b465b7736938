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

#![allow(non_snake_case)]

#[cfg(test)]
mod credential_flow_tests {

    use std::sync::Arc;

    use bbs_groupsig::{
        backend::{toy::ModularToy, PairingBackend},
        bbs::{
            commitment::Commitment,
            message::messages_to_scalars,
            params::Params,
            proof::SignatureProof,
            signature::Signature,
        },
        errors::Error,
        group::{holder::Holder, issuer::Issuer},
    };
    use ff::Field;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[cfg(feature = "bls12381")]
    use bbs_groupsig::backend::bls12381::{Bls12381Sha256, Bls12381Shake256};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scalars<B: PairingBackend>(values: &[u64]) -> Vec<B::Scalar> {
        values.iter().map(|&v| B::Scalar::from(v)).collect()
    }

    fn enroll<B: PairingBackend>(issuer: &Issuer<B>, holder: &mut Holder<B>, id: &str, rng: &mut StdRng) -> u64 {
        let ticket = issuer.join_1(id, rng).unwrap();
        let request = holder.join_1(id, &ticket, rng).unwrap();
        let s_issuer = issuer.join_2(id, &request, rng).unwrap();
        let (entry, proof) = holder.join_2(s_issuer, rng).unwrap();
        let response = issuer.join_3(id, &entry, &proof, rng).unwrap();
        holder.join_3(&response, issuer.public_key()).unwrap().index()
    }

    //SIGN AND VERIFY

    #[test]
    fn sign_verify_toy() {
        sign_verify::<ModularToy>(1);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn sign_verify_sha256() {
        sign_verify::<Bls12381Sha256>(1);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn sign_verify_shake256() {
        sign_verify::<Bls12381Shake256>(1);
    }

    fn sign_verify<B: PairingBackend>(seed: u64) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(seed);
        let params = Arc::new(Params::<B>::generate(4).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);

        let messages = scalars::<B>(&[123, 124, 124152, 11]);
        let signature = issuer.sign_messages(&messages, &mut rng).unwrap();
        assert!(signature.verify(&params, issuer.public_key(), &messages).is_ok());

        let altered = scalars::<B>(&[123, 124, 124152, 12]);
        assert_eq!(
            signature.verify(&params, issuer.public_key(), &altered),
            Err(Error::SignatureVerificationError)
        );

        let commitment = Commitment::commit(&params, &messages).unwrap();
        let decoded = Signature::<B>::from_bytes(&signature.to_bytes()).unwrap();
        assert!(decoded.verify_commitment(issuer.public_key(), &commitment.point()).is_ok());

        let other = Issuer::new(params.clone(), &mut rng);
        assert!(signature.verify(&params, other.public_key(), &messages).is_err());
    }

    //PARAMETERS

    #[test]
    fn params_determinism_toy() {
        params_determinism::<ModularToy>();
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn params_determinism_sha256() {
        params_determinism::<Bls12381Sha256>();
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn params_determinism_shake256() {
        params_determinism::<Bls12381Shake256>();
    }

    fn params_determinism<B: PairingBackend>() {
        let a = Params::<B>::generate(10).unwrap();
        let b = Params::<B>::generate(10).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );

        let small = Params::<B>::generate(5).unwrap();
        assert_eq!(small.generators(), &a.generators()[..7]);
        assert_eq!(small.pseudonym_base(), a.pseudonym_base());
        assert!(!a.generators().contains(&a.pseudonym_base()));
    }

    //SIGNATURE SOUNDNESS

    #[test]
    fn signature_soundness_toy() {
        signature_soundness::<ModularToy>(64);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn signature_soundness_sha256() {
        signature_soundness::<Bls12381Sha256>(3);
    }

    fn signature_soundness<B: PairingBackend>(trials: u64) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(7);
        let params = Arc::new(Params::<B>::generate(6).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);

        for _ in 0..trials {
            let len: usize = rng.gen_range(1..=6);
            let messages: Vec<B::Scalar> = (0..len).map(|_| B::Scalar::random(&mut rng)).collect();
            let signature = issuer.sign_messages(&messages, &mut rng).unwrap();
            assert!(issuer.verify(&signature, &messages).is_ok());

            let mut altered = messages.clone();
            let i: usize = rng.gen_range(0..len);
            altered[i] += B::Scalar::ONE;
            assert!(issuer.verify(&signature, &altered).is_err());
        }
    }

    //SPK COMPLETENESS

    #[test]
    fn spk_completeness_toy() {
        spk_completeness::<ModularToy>(5);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn spk_completeness_sha256() {
        spk_completeness::<Bls12381Sha256>(3);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn spk_completeness_shake256() {
        spk_completeness::<Bls12381Shake256>(3);
    }

    fn spk_completeness<B: PairingBackend>(len: usize) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(11);
        let params = Arc::new(Params::<B>::generate(len).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);
        let holder = Holder::new(params.clone());

        let messages: Vec<B::Scalar> = (0..len).map(|_| B::Scalar::random(&mut rng)).collect();
        let signature = issuer.sign_messages(&messages, &mut rng).unwrap();

        for mask in 0u32..(1 << len) {
            let disclosed: Vec<usize> = (0..len).filter(|i| mask & (1 << i) != 0).collect();
            let revealed: Vec<B::Scalar> = disclosed.iter().map(|&i| messages[i]).collect();
            let proof = holder
                .create_proof(issuer.public_key(), &signature, &messages, &disclosed, Some(b"ph"), &mut rng)
                .unwrap();
            assert!(proof
                .verify(&params, issuer.public_key(), &revealed, &disclosed, Some(b"ph"))
                .is_ok());
        }
    }

    //SPK SOUNDNESS

    #[test]
    fn spk_soundness_toy() {
        spk_soundness::<ModularToy>(32);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn spk_soundness_sha256() {
        spk_soundness::<Bls12381Sha256>(2);
    }

    fn spk_soundness<B: PairingBackend>(trials: u64) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(13);
        let params = Arc::new(Params::<B>::generate(4).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);
        let holder = Holder::new(params.clone());

        for _ in 0..trials {
            let messages: Vec<B::Scalar> = (0..4).map(|_| B::Scalar::random(&mut rng)).collect();
            let signature = issuer.sign_messages(&messages, &mut rng).unwrap();
            let disclosed = [0usize, 2];
            let revealed = [messages[0], messages[2]];

            // altered disclosed message
            let proof = holder
                .create_proof(issuer.public_key(), &signature, &messages, &disclosed, None, &mut rng)
                .unwrap();
            let forged = [messages[0], messages[2] + B::Scalar::ONE];
            assert!(matches!(
                proof.verify(&params, issuer.public_key(), &forged, &disclosed, None),
                Err(Error::ProofRejected(_))
            ));

            // altered hidden message
            let mut cheat = messages.clone();
            let hidden: usize = rng.gen_range(0..2) * 2 + 1;
            cheat[hidden] += B::Scalar::ONE;
            let proof = holder
                .create_proof(issuer.public_key(), &signature, &cheat, &disclosed, None, &mut rng)
                .unwrap();
            assert!(matches!(
                proof.verify(&params, issuer.public_key(), &revealed, &disclosed, None),
                Err(Error::ProofRejected(_))
            ));
        }
    }

    //JOIN AND MEMBERSHIP

    #[test]
    fn join_membership_toy() {
        join_membership::<ModularToy>(16);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn join_membership_sha256() {
        join_membership::<Bls12381Sha256>(2);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn join_membership_shake256() {
        join_membership::<Bls12381Shake256>(2);
    }

    fn join_membership<B: PairingBackend>(members: u64) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(17);
        let params = Arc::new(Params::<B>::generate(3).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);

        for i in 0..members {
            let mut holder = Holder::new(params.clone());
            let id = format!("member-{}", i);
            assert_eq!(enroll(&issuer, &mut holder, &id, &mut rng), i);

            let credential = holder.credential().unwrap();
            let registration = issuer.registration(i).unwrap();
            assert_eq!(registration.entry.holder_id, id);
            assert_eq!(registration.e, credential.e());
            assert_eq!(credential.signature().e(), credential.e());

            let proof = holder
                .prove_credential(issuer.public_key(), Some(id.as_bytes()), &mut rng)
                .unwrap();
            assert!(proof
                .verify(&params, issuer.public_key(), &[], &[], Some(id.as_bytes()))
                .is_ok());
        }

        let pseudonyms: Vec<B::G1> = issuer.registrations().iter().map(|r| r.entry.pseudonym).collect();
        for (i, p) in pseudonyms.iter().enumerate() {
            assert!(!pseudonyms[i + 1..].contains(p));
        }
    }

    //UNLINKABILITY

    #[test]
    fn unlinkable_proofs_toy() {
        unlinkable_proofs::<ModularToy>(32);
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn unlinkable_proofs_sha256() {
        unlinkable_proofs::<Bls12381Sha256>(4);
    }

    fn unlinkable_proofs<B: PairingBackend>(runs: usize) {
        init_logger();
        let mut rng = StdRng::seed_from_u64(19);
        let params = Arc::new(Params::<B>::generate(3).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);
        let mut holder = Holder::new(params.clone());
        enroll(&issuer, &mut holder, "alice", &mut rng);

        let signature = holder.credential().unwrap().signature();
        let mut a_bars: Vec<B::G1> = Vec::with_capacity(runs);
        let mut b_bars: Vec<B::G1> = Vec::with_capacity(runs);
        let mut challenges: Vec<B::Scalar> = Vec::with_capacity(runs);

        for _ in 0..runs {
            let proof = holder.prove_credential(issuer.public_key(), None, &mut rng).unwrap();
            assert!(proof.verify(&params, issuer.public_key(), &[], &[], None).is_ok());
            assert_ne!(proof.a_bar(), signature.a());

            assert!(!a_bars.contains(&proof.a_bar()));
            assert!(!b_bars.contains(&proof.b_bar()));
            assert!(!challenges.contains(&proof.challenge()));
            a_bars.push(proof.a_bar());
            b_bars.push(proof.b_bar());
            challenges.push(proof.challenge());
        }
    }

    //OCTET-STRING MESSAGES

    #[test]
    fn octet_messages_toy() {
        octet_messages::<ModularToy>();
    }

    #[cfg(feature = "bls12381")]
    #[test]
    fn octet_messages_shake256() {
        octet_messages::<Bls12381Shake256>();
    }

    fn octet_messages<B: PairingBackend>() {
        init_logger();
        let mut rng = StdRng::seed_from_u64(23);
        let params = Arc::new(Params::<B>::generate(3).unwrap());
        let issuer = Issuer::new(params.clone(), &mut rng);

        let raw: Vec<Vec<u8>> = vec![b"name=alice".to_vec(), b"age=42".to_vec(), Vec::new()];
        let messages = messages_to_scalars::<B>(&raw).unwrap();
        let signature = issuer.sign_messages(&messages, &mut rng).unwrap();

        let proof = SignatureProof::create(&params, issuer.public_key(), &signature, &messages, &[1], None, &mut rng).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let received: SignatureProof<B> = serde_json::from_str(&json).unwrap();

        let disclosed = messages_to_scalars::<B>(&[b"age=42".to_vec()]).unwrap();
        assert!(received.verify(&params, issuer.public_key(), &disclosed, &[1], None).is_ok());

        let lie = messages_to_scalars::<B>(&[b"age=18".to_vec()]).unwrap();
        assert!(received.verify(&params, issuer.public_key(), &lie, &[1], None).is_err());
    }
}
