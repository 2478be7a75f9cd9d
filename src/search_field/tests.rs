use super::*;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Mutex;
use tokio::sync::oneshot;

type Responder = oneshot::Sender<LookupResult<Vec<Candidate>>>;

/// Provider whose answers are released by the test, in any order
#[derive(Default)]
struct ScriptedLookup {
    calls: Mutex<Vec<(String, usize)>>,
    pending: Mutex<Vec<Option<Responder>>>,
}

impl ScriptedLookup {
    fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: usize, outcome: LookupResult<Vec<Candidate>>) {
        let responder = self.pending.lock().unwrap()[call]
            .take()
            .expect("lookup answered twice");
        let _ = responder.send(outcome);
    }
}

impl LookupProvider for ScriptedLookup {
    fn lookup(&self, query: &str, limit: usize) -> BoxFuture<'static, LookupResult<Vec<Candidate>>> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push((query.to_string(), limit));
        self.pending.lock().unwrap().push(Some(tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(LookupError::Aborted("responder dropped".to_string())))
        }
        .boxed()
    }
}

struct PanickingLookup;

impl LookupProvider for PanickingLookup {
    fn lookup(&self, query: &str, _limit: usize) -> BoxFuture<'static, LookupResult<Vec<Candidate>>> {
        let query = query.to_string();
        async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }
            panic!("directory offline while looking up {query}");
        }
        .boxed()
    }
}

fn john() -> Candidate {
    Candidate::new("1", "John", "Smith").with_national_id("12345678901")
}

fn jane() -> Candidate {
    Candidate::new("2", "Jane", "Smithson").with_national_id("10987654321")
}

fn scripted_field() -> (SearchField, Arc<ScriptedLookup>) {
    let provider = Arc::new(ScriptedLookup::default());
    let field = SearchField::new(FieldConfig::default(), provider.clone());
    (field, provider)
}

fn recording_field() -> (SearchField, Arc<ScriptedLookup>, Arc<Mutex<Vec<Candidate>>>) {
    let (field, provider) = scripted_field();
    let committed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&committed);
    let field = field.on_commit(move |candidate| sink.lock().unwrap().push(candidate.clone()));
    (field, provider, committed)
}

/// Type a query, let the debounce fire, and answer the lookup
async fn open_with(field: &mut SearchField, provider: &ScriptedLookup, results: Vec<Candidate>) {
    field.text_input("Smi");
    field.tick().await;
    let call = provider.calls().len() - 1;
    provider.respond(call, Ok(results));
    field.tick().await;
}

#[tokio::test(start_paused = true)]
async fn test_debounce_collapses_typing_burst() {
    let (mut field, provider) = scripted_field();
    let start = Instant::now();

    field.text_input("Al");
    field.text_input("Aln");
    assert!(provider.calls().is_empty());

    field.tick().await;

    assert_eq!(provider.calls(), vec![("Aln".to_string(), 10)]);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(field.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_restarts_on_each_keystroke() {
    let (mut field, provider) = scripted_field();
    let start = Instant::now();

    field.text_input("Al");
    tokio::time::advance(Duration::from_millis(200)).await;
    field.text_input("Aln");
    field.tick().await;

    assert_eq!(provider.calls().len(), 1);
    assert!(start.elapsed() >= Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_lookup_sends_trimmed_query() {
    let (mut field, provider) = scripted_field();

    field.text_input("  smith ");
    field.tick().await;

    assert_eq!(provider.calls(), vec![("smith".to_string(), 10)]);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_reaches_provider() {
    let (mut field, provider) = scripted_field();

    field.text_input("A");
    field.tick().await;

    assert!(provider.calls().is_empty());
    assert!(!field.state().is_open);
    assert!(!field.has_pending_timer());
}

#[tokio::test(start_paused = true)]
async fn test_results_open_list() {
    let (mut field, provider) = scripted_field();

    open_with(&mut field, &provider, vec![john(), jane()]).await;

    let state = field.state();
    assert_eq!(state.candidates, vec![john(), jane()]);
    assert!(state.is_open);
    assert!(!state.is_loading);
    assert_eq!(state.highlighted, None);
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_commit_fires_once() {
    let (field, provider, committed) = recording_field();
    let mut field = field.with_label_formatter(Arc::new(|c: &Candidate| c.full_name()));

    open_with(&mut field, &provider, vec![john()]).await;
    field.key_down(NavKey::ArrowDown);
    field.key_down(NavKey::Enter);

    assert_eq!(*committed.lock().unwrap(), vec![john()]);
    let state = field.state();
    assert_eq!(state.query, "John Smith");
    assert!(state.is_resolved);
    assert!(!state.is_open);
    assert!(state.candidates.is_empty());
    assert!(!field.has_pending_timer());
}

#[tokio::test(start_paused = true)]
async fn test_default_label_after_commit() {
    let (mut field, provider, _committed) = recording_field();

    open_with(&mut field, &provider, vec![john()]).await;
    field.candidate_activated(john());

    assert_eq!(field.state().query, "John Smith (ID: 12345678901)");
}

#[tokio::test(start_paused = true)]
async fn test_last_issued_wins_in_any_arrival_order() {
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let (mut field, provider) = scripted_field();
        for query in ["Sm", "Smi", "Smit"] {
            field.text_input(query);
            field.tick().await;
        }
        assert_eq!(provider.calls().len(), 3);

        for call in order {
            let result = Candidate::new(call.to_string(), "Result", "Row");
            provider.respond(call, Ok(vec![result]));
        }
        for _ in 0..3 {
            field.tick().await;
        }

        let state = field.state();
        assert_eq!(state.candidates.len(), 1, "order {order:?}");
        assert_eq!(state.candidates[0].id, "2", "order {order:?}");
        assert!(!state.is_loading, "order {order:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_missing_latest_response_keeps_loading() {
    let (mut field, provider) = scripted_field();
    for query in ["Sm", "Smi", "Smit"] {
        field.text_input(query);
        field.tick().await;
    }

    provider.respond(0, Ok(vec![john()]));
    provider.respond(1, Ok(vec![jane()]));
    field.tick().await;
    field.tick().await;

    let state = field.state();
    assert!(state.candidates.is_empty());
    assert!(state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_failure_clears_silently() {
    let (mut field, provider) = scripted_field();
    open_with(&mut field, &provider, vec![john()]).await;

    field.text_input("Smit");
    field.tick().await;
    provider.respond(1, Err(LookupError::Unavailable("503".to_string())));
    field.tick().await;

    let state = field.state();
    assert!(state.candidates.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.highlighted, None);
}

#[tokio::test(start_paused = true)]
async fn test_provider_panic_becomes_failure() {
    let mut field = SearchField::new(FieldConfig::default(), Arc::new(PanickingLookup));

    field.text_input("Smith");
    field.tick().await;
    assert!(field.state().is_loading);
    field.tick().await;

    let state = field.state();
    assert!(!state.is_loading);
    assert!(state.candidates.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shortened_query_orphans_inflight_lookup() {
    let (mut field, provider) = scripted_field();

    field.text_input("Smith");
    field.tick().await;
    field.text_input("S");
    field.tick().await;
    provider.respond(0, Ok(vec![john()]));
    field.tick().await;

    let state = field.state();
    assert!(state.candidates.is_empty());
    assert!(!state.is_open);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_commit_orphans_inflight_lookup() {
    let (mut field, provider, committed) = recording_field();
    open_with(&mut field, &provider, vec![john()]).await;

    field.text_input("Smit");
    field.tick().await;
    field.candidate_activated(john());
    provider.respond(1, Ok(vec![jane()]));
    field.tick().await;

    assert_eq!(committed.lock().unwrap().len(), 1);
    let state = field.state();
    assert!(state.candidates.is_empty());
    assert!(!state.is_open);
}

#[tokio::test(start_paused = true)]
async fn test_blur_closes_after_grace() {
    let (mut field, provider) = scripted_field();
    open_with(&mut field, &provider, vec![john()]).await;
    let start = Instant::now();

    field.blur();
    assert!(field.state().is_open);
    assert!(field.has_pending_timer());

    field.tick().await;

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(!field.state().is_open);
    assert_eq!(field.state().candidates, vec![john()]);
}

#[tokio::test(start_paused = true)]
async fn test_refocus_cancels_pending_close() {
    let (mut field, provider) = scripted_field();
    open_with(&mut field, &provider, vec![john()]).await;

    field.blur();
    tokio::time::advance(Duration::from_millis(100)).await;
    field.focus();

    assert!(!field.has_pending_timer());
    assert!(field.state().is_open);
}

#[tokio::test(start_paused = true)]
async fn test_pressed_row_commits_when_focus_leaves() {
    let (mut field, provider, committed) = recording_field();
    open_with(&mut field, &provider, vec![john(), jane()]).await;

    field.candidate_pressed(jane());
    field.blur();
    field.tick().await;

    assert_eq!(*committed.lock().unwrap(), vec![jane()]);
    assert!(field.state().query.starts_with("Jane Smithson"));
    assert!(field.state().is_resolved);
}

#[tokio::test(start_paused = true)]
async fn test_typing_after_commit_searches_again() {
    let (mut field, provider, _committed) = recording_field();
    open_with(&mut field, &provider, vec![john()]).await;
    field.candidate_activated(john());

    field.text_input("Jane");
    field.tick().await;

    assert_eq!(provider.calls().last(), Some(&("Jane".to_string(), 10)));
    assert!(!field.state().is_resolved);
}

#[tokio::test(start_paused = true)]
async fn test_directory_lookup_end_to_end() {
    let directory = DirectoryLookup::new(sample_directory()).with_latency(Duration::from_millis(500));
    let mut field = SearchField::new(FieldConfig::default(), Arc::new(directory));
    let start = Instant::now();

    field.text_input("smi");
    field.tick().await;
    field.tick().await;

    assert!(start.elapsed() >= Duration::from_millis(800));
    let state = field.state();
    assert!(state.is_open);
    assert!(!state.candidates.is_empty());
    assert!(
        state
            .candidates
            .iter()
            .all(|c| c.full_name().to_lowercase().contains("smi"))
    );
}
