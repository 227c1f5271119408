//! Proptest generators for property-based testing.

use proptest::prelude::*;

use collate_core::{CredentialToken, Key};

/// Generate a key: mostly path-safe identifiers, sometimes arbitrary
/// printable text.
pub fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        3 => "[a-zA-Z0-9_-]{1,32}",
        1 => "\\PC{1,24}",
    ]
    .prop_map(|s| Key::new(s).expect("strategy yields non-empty keys"))
}

/// Generate a value, including the empty string and multi-line text.
pub fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,64}",
        "[ -~\n\t]{0,128}",
    ]
}

/// Generate a credential token shaped like a hex SHA-1 digest.
pub fn token() -> impl Strategy<Value = CredentialToken> {
    "[0-9a-f]{40}".prop_map(|s| CredentialToken::new(s).expect("40 hex chars"))
}

/// Generate two tokens that are guaranteed to differ.
pub fn distinct_token_pair() -> impl Strategy<Value = (CredentialToken, CredentialToken)> {
    (token(), token()).prop_filter("tokens must differ", |(a, b)| !a.matches(b))
}

/// Parameters for a single write.
#[derive(Debug, Clone)]
pub struct WriteParams {
    pub key: Key,
    pub value: String,
    pub credential: CredentialToken,
}

impl Arbitrary for WriteParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (key(), value(), token())
            .prop_map(|(key, value, credential)| WriteParams {
                key,
                value,
                credential,
            })
            .boxed()
    }
}
