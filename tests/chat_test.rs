mod helpers;

use helpers::{note_block, test_config, Kind, Script, ScriptedModel};
use mycelia::chat::ChatSession;
use mycelia::knowledge::prompts::COMPANION_PROMPT;
use mycelia::llm::LanguageModel;
use mycelia::vault::types::Role;
use mycelia::vault::NoteStore;
use std::sync::Arc;
use tempfile::TempDir;

async fn open(tmp: &TempDir, model: Arc<ScriptedModel>) -> ChatSession {
    let config = Arc::new(test_config(tmp.path()));
    let model: Arc<dyn LanguageModel> = model;
    ChatSession::open(config, model).await.unwrap()
}

#[tokio::test]
async fn reply_is_streamed_logged_and_mined() {
    let tmp = TempDir::new().unwrap();
    let model = Arc::new(
        ScriptedModel::new()
            .reply(Kind::Chat, "Farriers are a great niche.")
            .reply(
                Kind::Extraction,
                &note_block("Farrier Software", "ideas", "farrier-software.md", "create", "Build for [[farriers]]."),
            )
            .reply(Kind::Journal, "You discussed [[farriers]]."),
    );
    let mut session = open(&tmp, Arc::clone(&model)).await;

    let mut streamed = String::new();
    let reply = session
        .send("I want to build software for farriers", &mut |c: &str| streamed.push_str(c))
        .await
        .unwrap();
    session.finish().await;

    assert_eq!(reply, "Farriers are a great niche.");
    assert_eq!(streamed, reply);

    let chat = model.requests_of(Kind::Chat);
    assert_eq!(chat[0].system, COMPANION_PROMPT);
    assert_eq!(chat[0].model, "claude-sonnet-4-6");

    let store = NoteStore::new(tmp.path());
    let log = store.load_conversation_log().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].role, Role::User);
    assert_eq!(log[1].content, reply);

    let notes = store.list_all().await.unwrap();
    assert!(notes.contains(&"ideas/farrier-software.md".to_string()));
    assert!(notes.iter().any(|n| n.starts_with("journals/")));
}

#[tokio::test]
async fn recall_question_gets_vault_context() {
    let tmp = TempDir::new().unwrap();
    let store = NoteStore::new(tmp.path());
    store.ensure_folder("decisions").await.unwrap();
    store
        .write("decisions", "farriers.md", "Decided to pursue [[farriers]].")
        .await
        .unwrap();

    let model = Arc::new(ScriptedModel::new());
    let mut session = open(&tmp, Arc::clone(&model)).await;
    session
        .send("What did I decide about the farrier idea?", &mut |_: &str| {})
        .await
        .unwrap();
    session.finish().await;

    let chat = model.requests_of(Kind::Chat);
    assert!(chat[0].system.contains("<vault_context>"));
    assert!(chat[0].system.contains("### File: decisions/farriers.md\nDecided to pursue [[farriers]]."));
}

#[tokio::test]
async fn failed_stream_keeps_partial_text() {
    let tmp = TempDir::new().unwrap();
    let model = Arc::new(ScriptedModel::new().with(
        Kind::Chat,
        Script::PartialThenFail { partial: "Well, I think".into(), status: 529 },
    ));
    let mut session = open(&tmp, Arc::clone(&model)).await;

    let mut streamed = String::new();
    let err = session
        .send("hello", &mut |c: &str| streamed.push_str(c))
        .await
        .unwrap_err();
    session.finish().await;

    assert!(format!("{err:#}").contains("529"));
    assert_eq!(streamed, "Well, I think");
    assert_eq!(session.turns().len(), 2);
    assert_eq!(session.turns()[1].content, "Well, I think");
    // no background mining after a failed reply
    assert!(model.requests_of(Kind::Extraction).is_empty());
}

#[tokio::test]
async fn history_survives_reopen_and_clear() {
    let tmp = TempDir::new().unwrap();
    let model = Arc::new(ScriptedModel::new());

    let mut session = open(&tmp, Arc::clone(&model)).await;
    session.send("first", &mut |_: &str| {}).await.unwrap();
    session.finish().await;

    let mut reopened = open(&tmp, Arc::clone(&model)).await;
    assert_eq!(reopened.turns().len(), 2);

    reopened.send("second", &mut |_: &str| {}).await.unwrap();
    reopened.finish().await;
    // the whole history is sent to the model
    let last = model.requests_of(Kind::Chat).pop().unwrap();
    assert_eq!(last.messages.len(), 3);

    reopened.clear().await.unwrap();
    assert!(reopened.turns().is_empty());
    let log = NoteStore::new(tmp.path()).load_conversation_log().await.unwrap();
    assert!(log.is_empty());
}
