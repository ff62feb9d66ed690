use std::collections::HashMap;

use ragassist_model::{CredentialSource, Llm, ModelError, ProviderChain};

struct Only(&'static str, &'static str);

impl CredentialSource for Only {
    fn get(&self, key: &str) -> Option<String> {
        (key == self.0).then(|| self.1.to_string())
    }
}

#[test]
fn custom_credential_sources_plug_into_the_chain() {
    let llm = ProviderChain::standard().select(&Only("GOOGLE_API_KEY", "g")).unwrap();
    assert_eq!(llm.provider(), "gemini");
}

#[test]
fn missing_credentials_produce_guidance() {
    let err = ProviderChain::standard()
        .select(&HashMap::<String, String>::new())
        .err()
        .expect("no provider");
    assert!(matches!(err, ModelError::NoProvider { .. }));
    let message = err.to_string();
    for key in ["OPENAI_API_KEY", "GROQ_API_KEY", "GOOGLE_API_KEY"] {
        assert!(message.contains(key), "{message} does not mention {key}");
    }
}

#[test]
fn every_standard_entry_builds_offline() {
    let chain = ProviderChain::standard();
    for entry in chain.entries() {
        let llm = (entry.factory)("test-key".into(), entry.default_model.into()).unwrap();
        assert_eq!(llm.provider(), entry.name);
        assert_eq!(llm.name(), entry.default_model);
    }
}
