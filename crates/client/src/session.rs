//! One user's page session: the board plus the actions that change it.
//!
//! Every successful mutation is followed by a full re-fetch; the board is
//! never patched locally. Failures end in a toast and nothing is retried.

use domain::models::{NewPhrase, Phrase};
use domain::services::{render, sort_newest_first, PhraseBoard, View};
use shared::validation::has_title_and_content;
use tracing::{info, warn};

use crate::api::PhraseApi;
use crate::clipboard::{copy_to_clipboard, ClipboardWriter};
use crate::error::ClientError;
use crate::toast::{Notifier, Toast};

const MISSING_FIELDS: &str = "Enter a title and text";

pub struct Session<A, N> {
    api: A,
    notifier: N,
    board: PhraseBoard,
}

impl<A: PhraseApi, N: Notifier> Session<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            board: PhraseBoard::new(),
        }
    }

    pub fn board(&self) -> &PhraseBoard {
        &self.board
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the board with the server's list, in display order. On
    /// failure the board keeps its previous contents.
    pub async fn fetch_all(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(mut phrases) => {
                sort_newest_first(&mut phrases);
                self.board.replace(phrases);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch phrases");
                self.notifier.notify(Toast::error("Failed to load phrases"));
                Err(e)
            }
        }
    }

    /// Creates one phrase from trimmed input.
    pub async fn add(&mut self, title: &str, content: &str) -> Result<(), ClientError> {
        let phrase = NewPhrase::new(title.trim(), content.trim());
        if !phrase.is_complete() {
            return Err(self.reject_incomplete());
        }

        if let Err(e) = self.api.create(&phrase).await {
            return Err(self.report_failure("Save failed", e));
        }

        info!(title = %phrase.title, "Phrase added");
        self.notifier.notify(Toast::success("Phrase added"));
        self.fetch_all().await
    }

    /// Submits drafts as one batch. Incomplete drafts are sent as-is and
    /// skipped by the server; nothing is sent if no draft is complete.
    pub async fn add_batch(&mut self, drafts: Vec<NewPhrase>) -> Result<usize, ClientError> {
        if !drafts.iter().any(NewPhrase::is_complete) {
            return Err(self.reject_incomplete());
        }

        let response = match self.api.create_batch(&drafts).await {
            Ok(response) => response,
            Err(e) => return Err(self.report_failure("Save failed", e)),
        };

        let count = response.count.unwrap_or(0);
        info!(submitted = drafts.len(), count, "Phrase batch saved");
        self.notifier
            .notify(Toast::success(format!("Saved {} phrases", count)));
        self.fetch_all().await?;
        Ok(count)
    }

    /// Replaces a phrase's title and content. An id the server does not know
    /// is not an error.
    pub async fn edit(&mut self, id: i64, title: &str, content: &str) -> Result<(), ClientError> {
        if !has_title_and_content(title, content) {
            return Err(self.reject_incomplete());
        }

        if let Err(e) = self.api.update(id, title, content).await {
            return Err(self.report_failure("Update failed", e));
        }

        info!(phrase_id = id, "Phrase updated");
        self.notifier.notify(Toast::success("Phrase updated"));
        self.fetch_all().await
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        if let Err(e) = self.api.delete(id).await {
            return Err(self.report_failure("Delete failed", e));
        }

        info!(phrase_id = id, "Phrase deleted");
        self.notifier.notify(Toast::success("Phrase deleted"));
        self.fetch_all().await
    }

    /// Copies a phrase's content and shows the outcome.
    ///
    /// Returns the toast, or `None` when the id is not on the board.
    pub async fn copy(
        &self,
        id: i64,
        primary: &dyn ClipboardWriter,
        fallback: &dyn ClipboardWriter,
    ) -> Option<Toast> {
        let phrase: &Phrase = self.board.get(id)?;
        let toast = copy_to_clipboard(primary, fallback, &phrase.content).await;
        self.notifier.notify(toast.clone());
        Some(toast)
    }

    pub fn render(&self, filter: &str) -> View {
        render(&self.board, filter)
    }

    fn reject_incomplete(&self) -> ClientError {
        self.notifier.notify(Toast::warning(MISSING_FIELDS));
        ClientError::Validation(MISSING_FIELDS.to_string())
    }

    fn report_failure(&self, action: &str, error: ClientError) -> ClientError {
        warn!(error = %error, "{}", action);
        self.notifier
            .notify(Toast::error(format!("{}: {}", action, error.user_message())));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use domain::models::MutationResponse;
    use std::sync::{Arc, Mutex};

    use crate::clipboard::Osc52Clipboard;
    use crate::toast::ToastKind;

    /// In-memory stand-in for the server.
    #[derive(Default)]
    struct FakeApi {
        rows: Mutex<Vec<Phrase>>,
        next_id: Mutex<i64>,
        fail_list: Mutex<bool>,
        fail_writes: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        fn insert(&self, title: &str, content: &str) {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
                + Duration::seconds(*next_id);
            self.rows.lock().unwrap().insert(
                0,
                Phrase {
                    id: *next_id,
                    title: title.to_string(),
                    content: content.to_string(),
                    created_at,
                },
            );
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn server_error() -> ClientError {
            ClientError::Status {
                status: 500,
                body: r#"{"error":"internal_error","message":"disk full"}"#.to_string(),
            }
        }
    }

    #[async_trait]
    impl PhraseApi for Arc<FakeApi> {
        async fn list(&self) -> Result<Vec<Phrase>, ClientError> {
            self.record("list");
            if *self.fail_list.lock().unwrap() {
                return Err(FakeApi::server_error());
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, phrase: &NewPhrase) -> Result<MutationResponse, ClientError> {
            self.record("create");
            if self.fail_writes {
                return Err(FakeApi::server_error());
            }
            self.insert(&phrase.title, &phrase.content);
            Ok(MutationResponse::ok())
        }

        async fn create_batch(
            &self,
            phrases: &[NewPhrase],
        ) -> Result<MutationResponse, ClientError> {
            self.record("create_batch");
            if self.fail_writes {
                return Err(FakeApi::server_error());
            }
            let mut count = 0;
            for phrase in phrases.iter().filter(|p| p.is_complete()) {
                self.insert(&phrase.title, &phrase.content);
                count += 1;
            }
            Ok(MutationResponse::with_count(count))
        }

        async fn update(
            &self,
            id: i64,
            title: &str,
            content: &str,
        ) -> Result<MutationResponse, ClientError> {
            self.record("update");
            if self.fail_writes {
                return Err(FakeApi::server_error());
            }
            if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|p| p.id == id) {
                row.title = title.to_string();
                row.content = content.to_string();
            }
            Ok(MutationResponse::ok())
        }

        async fn delete(&self, id: i64) -> Result<MutationResponse, ClientError> {
            self.record("delete");
            if self.fail_writes {
                return Err(FakeApi::server_error());
            }
            self.rows.lock().unwrap().retain(|p| p.id != id);
            Ok(MutationResponse::ok())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Toast>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            self.0.lock().unwrap().push(toast);
        }
    }

    impl RecordingNotifier {
        fn last(&self) -> Option<Toast> {
            self.0.lock().unwrap().last().cloned()
        }

        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    type TestSession = Session<Arc<FakeApi>, Arc<RecordingNotifier>>;

    fn session_with(api: FakeApi) -> (TestSession, Arc<FakeApi>, Arc<RecordingNotifier>) {
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        (Session::new(api.clone(), notifier.clone()), api, notifier)
    }

    fn session() -> (TestSession, Arc<FakeApi>, Arc<RecordingNotifier>) {
        session_with(FakeApi::default())
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_board() {
        let (mut session, api, notifier) = session();
        api.insert("a", "1");
        api.insert("b", "2");

        session.fetch_all().await.unwrap();

        let titles: Vec<_> = session.board().phrases().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_orders_newest_first() {
        let (mut session, api, _notifier) = session();
        api.insert("old", "1");
        api.insert("middle", "2");
        api.insert("new", "3");
        api.rows.lock().unwrap().reverse();

        session.fetch_all().await.unwrap();

        let titles: Vec<_> = session.board().phrases().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_board() {
        let (mut session, api, notifier) = session();
        api.insert("a", "1");
        session.fetch_all().await.unwrap();

        *api.fail_list.lock().unwrap() = true;
        api.insert("b", "2");
        assert!(session.fetch_all().await.is_err());

        assert_eq!(session.board().len(), 1);
        assert_eq!(notifier.last().unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_add_trims_and_refetches() {
        let (mut session, api, notifier) = session();

        session.add("  Greeting ", " Hello \n").await.unwrap();

        assert_eq!(api.calls(), vec!["create", "list"]);
        let phrase = &session.board().phrases()[0];
        assert_eq!(phrase.title, "Greeting");
        assert_eq!(phrase.content, "Hello");
        assert_eq!(notifier.last(), Some(Toast::success("Phrase added")));
    }

    #[tokio::test]
    async fn test_add_blank_sends_nothing() {
        let (mut session, api, notifier) = session();

        let err = session.add("Title", "   ").await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.calls().is_empty());
        assert_eq!(notifier.last(), Some(Toast::warning(MISSING_FIELDS)));
    }

    #[tokio::test]
    async fn test_add_server_failure_toasts_message() {
        let (mut session, api, notifier) = session_with(FakeApi::failing_writes());

        assert!(session.add("a", "b").await.is_err());

        assert_eq!(api.calls(), vec!["create"]);
        assert_eq!(notifier.last(), Some(Toast::error("Save failed: disk full")));
    }

    #[tokio::test]
    async fn test_add_batch_reports_count() {
        let (mut session, api, notifier) = session();
        api.insert("existing", "kept");

        let drafts = vec![
            NewPhrase::new("one", "1"),
            NewPhrase::new("title only", ""),
            NewPhrase::new("two", "2"),
        ];
        let count = session.add_batch(drafts).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(session.board().len(), 3);
        assert_eq!(notifier.last(), Some(Toast::success("Saved 2 phrases")));
    }

    #[tokio::test]
    async fn test_add_batch_all_blank_sends_nothing() {
        let (mut session, api, _notifier) = session();

        let drafts = vec![NewPhrase::new("", ""), NewPhrase::new("x", " ")];
        assert!(session.add_batch(drafts).await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_updates_target() {
        let (mut session, api, _notifier) = session();
        api.insert("a", "1");
        api.insert("b", "2");
        session.fetch_all().await.unwrap();
        let target = session.board().phrases()[1].id;

        session.edit(target, "edited", "new").await.unwrap();

        let edited = session.board().get(target).unwrap();
        assert_eq!(edited.title, "edited");
        assert_eq!(edited.content, "new");
        assert_eq!(session.board().phrases()[0].title, "b");
    }

    #[tokio::test]
    async fn test_edit_blank_rejected_locally() {
        let (mut session, api, _notifier) = session();

        assert!(session.edit(1, "", "x").await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_success() {
        let (mut session, api, notifier) = session();
        api.insert("a", "1");

        session.delete(999).await.unwrap();

        assert_eq!(session.board().len(), 1);
        assert_eq!(notifier.last(), Some(Toast::success("Phrase deleted")));
    }

    #[tokio::test]
    async fn test_delete_removes_phrase() {
        let (mut session, api, _notifier) = session();
        api.insert("a", "1");
        session.fetch_all().await.unwrap();
        let id = session.board().phrases()[0].id;

        session.delete(id).await.unwrap();

        assert!(session.board().is_empty());
        assert!(session.render("").is_empty());
    }

    #[tokio::test]
    async fn test_render_filters_board() {
        let (mut session, api, _notifier) = session();
        api.insert("Meeting notice", "See you at 10");
        api.insert("Thanks", "Thank you for the MEETING");
        api.insert("Other", "unrelated");
        session.fetch_all().await.unwrap();

        let view = session.render("meeting");
        assert_eq!(view.cards().len(), 2);
        assert!(session.render("zzz").is_empty());
    }

    #[tokio::test]
    async fn test_copy_uses_phrase_content() {
        let (mut session, api, notifier) = session();
        api.insert("Greeting", "hello");
        session.fetch_all().await.unwrap();
        let id = session.board().phrases()[0].id;

        let primary = Osc52Clipboard::new(Vec::new());
        let fallback = Osc52Clipboard::new(Vec::new());
        let toast = session.copy(id, &primary, &fallback).await.unwrap();

        assert!(toast.is_success());
        assert_eq!(notifier.last(), Some(toast));
        assert_eq!(primary.into_inner(), b"\x1b]52;c;aGVsbG8=\x07");
        assert!(fallback.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_copy_unknown_id() {
        let (session, _api, notifier) = session();
        let clipboard = Osc52Clipboard::new(Vec::new());

        assert!(session.copy(1, &clipboard, &clipboard).await.is_none());
        assert_eq!(notifier.count(), 0);
    }
}
