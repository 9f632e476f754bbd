use codestudio::action::{ActionScanner, ActionStatus, TagVocabulary};
use codestudio::session::{BatchDisposition, GenerationStatus, Role, Session};
use std::sync::Arc;
use std::thread;

fn scanner() -> ActionScanner {
    ActionScanner::new(TagVocabulary::custom("Artifact", "Action").unwrap())
}

#[test]
fn generation_round_trip() {
    let session = Session::default();
    let id = session.current_id();
    session.set_status(id, GenerationStatus::Loading);

    let request = session.begin_request();
    let response = r#"Sure.
<Artifact><Action type="file" filePath="index.html"><p>hi</p></Action>
<Action type="shell">npm run dev</Action></Artifact>"#;
    let disposition = session.ingest_response(request, &scanner(), response);
    assert!(matches!(disposition, BatchDisposition::Applied(_)));
    session.record_exchange(id, "make a page", response);
    session.set_status(id, GenerationStatus::Complete);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.steps.len(), 2);
    assert!(snapshot.steps.iter().all(|s| s.status == ActionStatus::Completed));
    assert_eq!(snapshot.selected_file.as_deref(), Some("index.html"));
    assert_eq!(snapshot.messages[0].role, Role::User);
    assert_eq!(snapshot.status, GenerationStatus::Complete);

    session.edit_file("index.html", "<p>edited</p>").unwrap();
    assert_eq!(
        session.selected_file_content().as_deref(),
        Some("<p>edited</p>")
    );
}

#[test]
fn follow_up_batch_retags_existing_paths() {
    let session = Session::default();
    let scanner = scanner();
    let first = session.begin_request();
    session.ingest_response(
        first,
        &scanner,
        r#"<Action type="file" filePath="src/App.jsx">v1</Action>"#,
    );
    let second = session.begin_request();
    session.ingest_response(
        second,
        &scanner,
        r#"<Action type="file" filePath="src/App.jsx">v2</Action>"#,
    );

    let snapshot = session.snapshot();
    assert_eq!(snapshot.steps[1].action.kind(), "UpdateFile");
    assert_eq!(snapshot.steps[1].title(), "Update File");
    assert_eq!(snapshot.tree.find_file("src/App.jsx").unwrap().content, "v2");
}

#[test]
fn concurrent_submissions_apply_in_request_order() {
    let session = Arc::new(Session::default());
    let requests: Vec<_> = (0..8).map(|_| session.begin_request()).collect();

    let handles: Vec<_> = requests
        .into_iter()
        .enumerate()
        .rev()
        .map(|(i, request)| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let text = format!(
                    r#"<Action type="file" filePath="out.txt">{}</Action>"#,
                    i
                );
                session.ingest_response(request, &scanner(), &text)
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = session.snapshot();
    assert_eq!(snapshot.tree.find_file("out.txt").unwrap().content, "7");
    let kinds: Vec<&str> = snapshot.steps.iter().map(|s| s.action.kind()).collect();
    assert_eq!(kinds[0], "CreateFile");
    assert!(kinds[1..].iter().all(|k| *k == "UpdateFile"));
}

#[tokio::test]
async fn observers_receive_whole_snapshots() {
    let session = Arc::new(Session::default());
    let mut rx = session.subscribe();
    let writer = Arc::clone(&session);

    let task = tokio::spawn(async move {
        let request = writer.begin_request();
        writer.ingest_response(
            request,
            &scanner(),
            r#"<Action type="file" filePath="a">1</Action><Action type="file" filePath="b">2</Action>"#,
        )
    });

    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.tree.file_count(), 2);
    assert_eq!(snapshot.pending_steps(), 0);
    assert!(matches!(task.await.unwrap(), BatchDisposition::Applied(_)));
}

#[test]
fn reset_discards_in_flight_batch() {
    let session = Session::default();
    let in_flight = session.begin_request();
    session.reset();
    let disposition = session.ingest_response(
        in_flight,
        &scanner(),
        r#"<Action type="file" filePath="late.js">x</Action>"#,
    );
    assert!(matches!(disposition, BatchDisposition::Discarded { .. }));
    assert!(session.snapshot().tree.is_empty());
}
