use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use ragassist_cli::{AppConfig, ErrorPolicy, ScriptedInput, SessionEnd, assemble, bootstrap, run_loop};
use ragassist_model::{MockLlm, ModelError};
use ragassist_rag::{InMemoryVectorStore, MockEmbeddingProvider, load_documents};

const PROMPT_YAML: &str = r#"
role: "Answer from the context only."
context: "Context: {context}"
question: "Question: {question}"
"#;

fn config_for(dir: &std::path::Path, extra: &[&str]) -> AppConfig {
    let mut args = vec![
        "ragassist".to_string(),
        "--data-dir".to_string(),
        dir.join("data").display().to_string(),
        "--prompt".to_string(),
        dir.join("prompt.yaml").display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    AppConfig::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn missing_credentials_fail_before_loading_models() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &[]);

    let err = bootstrap(&config, &HashMap::<String, String>::new()).await.err().unwrap();
    let model_err = err.downcast_ref::<ModelError>().expect("model error");
    assert!(matches!(model_err, ModelError::NoProvider { .. }));
    assert!(err.to_string().contains("OPENAI_API_KEY, GROQ_API_KEY, or GOOGLE_API_KEY"));
}

#[tokio::test]
async fn scripted_session_answers_from_loaded_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/sky.txt"), "The sky is blue because of Rayleigh scattering.")
        .unwrap();
    std::fs::write(dir.path().join("data/ignored.pdf"), "not text").unwrap();
    std::fs::write(dir.path().join("prompt.yaml"), PROMPT_YAML).unwrap();

    let config = config_for(dir.path(), &["--top-k", "1"]);
    let llm = Arc::new(MockLlm::new("Rayleigh scattering."));
    let assistant = assemble(
        &config,
        llm.clone(),
        Arc::new(MockEmbeddingProvider::new(16)),
        Arc::new(InMemoryVectorStore::new()),
    )
    .await
    .unwrap();

    let documents = load_documents(&config.data_dir).unwrap();
    assert_eq!(documents.len(), 1);
    assistant.add_documents(&documents).await.unwrap();

    let mut input = ScriptedInput::new(["Why is the sky blue?", "exit"]);
    let mut out = Vec::new();
    let end = run_loop(&mut input, &assistant, ErrorPolicy::Terminate, &mut out).await.unwrap();

    assert_eq!(end, SessionEnd::Exit);
    assert_eq!(String::from_utf8(out).unwrap(), "Assistant: Rayleigh scattering.\nGoodbye!\n");
    assert_eq!(
        llm.prompts(),
        vec![
            "Answer from the context only.\n\
             Context: The sky is blue because of Rayleigh scattering.\n\
             Question: Why is the sky blue?"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn reset_flag_clears_previous_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(InMemoryVectorStore::new());
    let embedder = Arc::new(MockEmbeddingProvider::new(8));

    let first = assemble(&config_for(dir.path(), &[]), Arc::new(MockLlm::new("ok")), embedder.clone(), store.clone())
        .await
        .unwrap();
    first.add_documents(&[ragassist_rag::Document::new("old text")]).await.unwrap();
    assert_eq!(first.pipeline().count().await.unwrap(), 1);

    let second =
        assemble(&config_for(dir.path(), &["--reset"]), Arc::new(MockLlm::new("ok")), embedder, store)
            .await
            .unwrap();
    assert_eq!(second.pipeline().count().await.unwrap(), 0);
}
