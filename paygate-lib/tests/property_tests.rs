//! Property-based tests for request signing and the wire codec.
//!
//! These tests use proptest to verify invariants across a wide range of inputs.

use paygate_lib::codec::{WireCodec, XmlCodec};
use paygate_lib::signing::{self, SignType};
use paygate_lib::verifier::ResponseVerifier;
use paygate_lib::Params;
use proptest::prelude::*;

fn sign_type() -> impl Strategy<Value = SignType> {
    prop_oneof![Just(SignType::Md5), Just(SignType::HmacSha256)]
}

fn fields() -> impl Strategy<Value = Vec<(String, String)>> {
    let name = "[a-z][a-z_]{0,11}".prop_filter("sign is reserved", |k| k != "sign");
    prop::collection::vec((name, "[ -~]{0,24}"), 1..12)
}

fn key() -> impl Strategy<Value = String> {
    "[0-9a-zA-Z]{1,32}"
}

proptest! {
    /// Insertion order never changes the signature.
    #[test]
    fn signature_ignores_insertion_order(
        entries in fields(),
        key in key(),
        sign_type in sign_type(),
    ) {
        let forward: Params = entries.iter().cloned().collect();
        let reversed: Params = entries.iter().rev().cloned().collect();

        // Later duplicates win on insertion, so only compare when keys are unique.
        prop_assume!(forward == reversed);

        prop_assert_eq!(
            signing::sign(&forward, sign_type, &key).unwrap(),
            signing::sign(&reversed, sign_type, &key).unwrap()
        );
    }

    /// Signatures are uppercase hex of the digest length.
    #[test]
    fn signature_shape(entries in fields(), key in key(), sign_type in sign_type()) {
        let params: Params = entries.into_iter().collect();
        let sign = signing::sign(&params, sign_type, &key).unwrap();

        let expected_len = match sign_type {
            SignType::Md5 => 32,
            SignType::HmacSha256 => 64,
        };
        prop_assert_eq!(sign.len(), expected_len);
        prop_assert!(sign.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    /// An existing sign field and empty values do not affect the signature.
    #[test]
    fn signature_ignores_sign_and_blank_fields(
        entries in fields(),
        key in key(),
        stale in "[A-F0-9]{32}",
        blank in "[a-z]{3,8}",
    ) {
        let params: Params = entries.into_iter().collect();
        prop_assume!(!params.contains_key(&blank));

        let mut decorated = params.clone();
        decorated.insert("sign", stale);
        decorated.insert(blank, "");

        prop_assert_eq!(
            signing::sign(&params, SignType::Md5, &key).unwrap(),
            signing::sign(&decorated, SignType::Md5, &key).unwrap()
        );
    }

    /// A freshly signed map verifies; changing any signed value breaks it.
    #[test]
    fn tampering_is_detected(
        entries in fields(),
        key in key(),
        sign_type in sign_type(),
        index in any::<prop::sample::Index>(),
    ) {
        let mut params: Params = entries.into_iter().collect();
        let sign = signing::sign(&params, sign_type, &key).unwrap();
        params.insert("sign", sign);

        let verifier = ResponseVerifier::new(sign_type, &key);
        prop_assert!(verifier.sign_verify(&params).unwrap());

        let fields: Vec<String> = params
            .keys()
            .filter(|k| *k != "sign")
            .map(str::to_string)
            .collect();
        let target = index.get(&fields).clone();
        let tampered_value = format!("{}x", params.value(&target));

        let mut tampered = params.clone();
        tampered.insert(target, tampered_value);
        prop_assert!(!verifier.sign_verify(&tampered).unwrap());
    }

    /// A different secret never verifies.
    #[test]
    fn wrong_key_is_rejected(entries in fields(), key in key(), other in key()) {
        prop_assume!(key != other);

        let mut params: Params = entries.into_iter().collect();
        let sign = signing::sign(&params, SignType::HmacSha256, &key).unwrap();
        params.insert("sign", sign);

        let verifier = ResponseVerifier::new(SignType::HmacSha256, &other);
        prop_assert!(!verifier.sign_verify(&params).unwrap());
    }

    /// Decoding what was encoded yields the same map, so signatures survive the wire.
    #[test]
    fn codec_preserves_signed_fields(entries in fields(), key in key()) {
        let mut params: Params = entries
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        let sign = signing::sign(&params, SignType::Md5, &key).unwrap();
        params.insert("sign", sign);

        let decoded = XmlCodec.decode(&XmlCodec.encode(&params).unwrap()).unwrap();
        prop_assert_eq!(&decoded, &params);
        prop_assert!(signing::verify(&decoded, SignType::Md5, &key).unwrap());
    }
}
