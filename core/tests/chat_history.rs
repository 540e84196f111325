use qviz_core::{
    chat::{ChatHistory, ChatMessage, ChatPanel, Role, CHAT_HISTORY_KEY, FALLBACK_REPLY},
    error::VizError,
    store::KvStore,
};

fn store() -> KvStore {
    let store = KvStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn transcript_persists_in_order() {
    let store = store();
    store.append_chat_message(ChatMessage::user("What is tunneling?")).unwrap();
    store.append_chat_message(ChatMessage::assistant("A particle crossing a barrier.")).unwrap();

    let history = store.load_chat_history().unwrap();
    let roles: Vec<Role> = history.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(history.messages()[0].content, "What is tunneling?");
}

#[test]
fn clearing_removes_the_key() {
    let store = store();
    store.append_chat_message(ChatMessage::user("hi")).unwrap();
    store.clear_chat_history().unwrap();
    assert_eq!(store.get(CHAT_HISTORY_KEY).unwrap(), None);
    assert!(store.load_chat_history().unwrap().is_empty());
}

#[test]
fn legacy_entries_without_timestamp_load() {
    let raw = r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]"#;
    let history = ChatHistory::parse_lenient(raw);
    assert_eq!(history.len(), 2);
    assert!(history.messages().iter().all(|m| m.sent_at.is_none()));
}

#[test]
fn malformed_entries_are_dropped_individually() {
    let raw = r#"[{"role":"user","content":"ok"},{"role":"robot","content":"?"},42]"#;
    let history = ChatHistory::parse_lenient(raw);
    assert_eq!(history.len(), 1);
    assert!(ChatHistory::parse_lenient("garbage").is_empty());
    assert!(ChatHistory::parse_lenient(r#"{"role":"user"}"#).is_empty());
}

#[test]
fn panel_rejects_blank_input() {
    let mut panel = ChatPanel::default();
    assert!(matches!(panel.submit("   "), Err(VizError::EmptyMessage)));
    assert!(panel.history().is_empty());
    assert!(!panel.is_pending());
}

#[test]
fn panel_allows_one_request_at_a_time() {
    let mut panel = ChatPanel::default();
    let request = panel.submit("  Why does observation matter?  ").expect("submit");
    assert_eq!(request.message, "Why does observation matter?");
    assert!(panel.is_pending());
    assert!(matches!(panel.submit("again"), Err(VizError::RequestInFlight)));
    assert_eq!(panel.history().len(), 1);

    let reply = panel.resolve(Ok::<_, String>("Because it collapses the state.".into()));
    assert_eq!(reply.role, Role::Assistant);
    assert!(!panel.is_pending());
    assert_eq!(panel.history().len(), 2);
}

#[test]
fn failed_request_becomes_a_retryable_fallback_bubble() {
    let mut panel = ChatPanel::new(ChatHistory::new());
    panel.submit("Explain entanglement").unwrap();
    let reply = panel.resolve(Err::<String, _>("connection reset"));
    assert_eq!(reply.content, FALLBACK_REPLY);
    assert!(!panel.is_pending());

    // The user can simply ask again.
    assert!(panel.submit("Explain entanglement").is_ok());
}
