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

mod credential_flow_example {
    use std::sync::Arc;

    use bbs_groupsig::{
        backend::PairingBackend,
        bbs::{message::messages_to_scalars, params::Params, proof::SignatureProof},
        errors::Error,
        group::{holder::Holder, issuer::Issuer},
    };

    pub(crate) fn credential_flow_main<B: PairingBackend>() -> Result<(), Error> {
        const ATTRIBUTES: [&str; 4] = ["name=alice", "country=IT", "birth_year=1990", "role=engineer"];

        let mut rng = rand::thread_rng();

        log::info!("Parameter Generation...");
        let params = Arc::new(Params::<B>::generate(ATTRIBUTES.len())?);
        log::info!("Params: {}", serde_json::to_string(params.as_ref()).unwrap_or_default());

        log::info!("Issuer Setup...");
        let issuer = Issuer::new(params.clone(), &mut rng);
        let issuer_pk = issuer.public_key();
        log::info!("PK: {}", issuer_pk.encode());

        // group membership
        let mut holder = Holder::new(params.clone());
        log::info!("Join...");
        let ticket = issuer.join_1("alice", &mut rng)?;
        let request = holder.join_1("alice", &ticket, &mut rng)?;
        let s_issuer = issuer.join_2("alice", &request, &mut rng)?;
        let (entry, join_proof) = holder.join_2(s_issuer, &mut rng)?;
        let response = issuer.join_3("alice", &entry, &join_proof, &mut rng)?;
        let index = holder.join_3(&response, issuer_pk)?.index();
        log::info!("Holder registered at index {}", index);

        let nonce_verifier: [u8; 16] = rand::random();
        log::info!("Nonce: {}", hex::encode(nonce_verifier));
        let membership = holder.prove_credential(issuer_pk, Some(nonce_verifier.as_slice()), &mut rng)?;
        membership.verify(&params, issuer_pk, &[], &[], Some(nonce_verifier.as_slice()))?;
        log::info!("Membership proof is VALID!");

        // attribute credential with selective disclosure
        let messages: Vec<Vec<u8>> = ATTRIBUTES.iter().map(|a| a.as_bytes().to_vec()).collect();
        let scalars = messages_to_scalars::<B>(&messages)?;

        log::info!("Signature Computation...");
        let signature = issuer.sign_messages(&scalars, &mut rng)?;
        signature.verify(&params, issuer_pk, &scalars)?;
        log::info!("Signature: {}", hex::encode(signature.to_bytes()));

        let disclosed_indexes = [1usize, 3usize];
        log::info!("Proof of Knowledge of the Signature Generation...");
        let proof = holder.create_proof(
            issuer_pk,
            &signature,
            &scalars,
            &disclosed_indexes,
            Some(nonce_verifier.as_slice()),
            &mut rng,
        )?;
        let wire = proof.to_bytes();
        log::info!("Proof: {} ({} bytes)", hex::encode(&wire), wire.len());

        let received = SignatureProof::<B>::from_bytes(&wire)?;
        let disclosed = messages_to_scalars::<B>(&[messages[1].clone(), messages[3].clone()])?;
        log::info!("Proof of Knowledge of the Signature verification...");
        received.verify(&params, issuer_pk, &disclosed, &disclosed_indexes, Some(nonce_verifier.as_slice()))?;
        log::info!("Proof of Knowledge of the Signature is VALID!");

        Ok(())
    }
}

fn main() {
    use crate::credential_flow_example::credential_flow_main;
    use bbs_groupsig::backend::toy::ModularToy;
    use std::env;

    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        println!(
            "Usage: {} <backend>
                Backends:
                    - BLS12-381-SHA-256
                    - BLS12-381-SHAKE-256
                    - TOY",
            args[0]
        );
        return;
    }

    let backend = &args[1];

    let result = match backend.as_str() {
        #[cfg(feature = "bls12381")]
        "BLS12-381-SHA-256" => {
            log::info!("Backend: BLS12-381-SHA-256");
            credential_flow_main::<bbs_groupsig::backend::bls12381::Bls12381Sha256>()
        }
        #[cfg(feature = "bls12381")]
        "BLS12-381-SHAKE-256" => {
            log::info!("Backend: BLS12-381-SHAKE-256");
            credential_flow_main::<bbs_groupsig::backend::bls12381::Bls12381Shake256>()
        }
        "TOY" => {
            log::info!("Backend: TOY (insecure)");
            credential_flow_main::<ModularToy>()
        }
        _ => {
            println!("Unknown backend: {}", backend);
            return;
        }
    };

    if let Err(e) = result {
        log::error!("credential flow failed: {}", e);
    }
}
