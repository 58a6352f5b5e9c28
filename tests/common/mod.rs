#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A config file inside its own temporary directory.
    ///
    /// The directory (and the file) is removed when this is dropped.
    pub struct TempConfig {
        pub dir: TempDir,
        pub path: PathBuf,
    }

    impl TempConfig {
        pub fn rewrite(&self, content: &str) {
            std::fs::write(&self.path, content).unwrap();
        }
    }

    pub fn create_temp_config(content: &str, ext: &str) -> TempConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("transitions.{ext}"));
        std::fs::write(&path, content).unwrap();
        TempConfig { dir, path }
    }

    pub fn create_temp_yaml(content: &str) -> TempConfig {
        create_temp_config(content, "yaml")
    }
}

pub mod fixtures {
    use std::sync::Arc;
    use url::Url;
    use velvette::config::{Config, RuleConfig};
    use velvette::dom::{ElementSpec, MemoryDocument, NodeId};
    use velvette::router::{HistoryEntry, NavigateEvent, NavigationDescription, NavigationType};

    pub const BASE: &str = "https://music.test/";

    pub fn url(path: &str) -> Url {
        Url::parse(BASE).unwrap().join(path).unwrap()
    }

    pub fn nav(from: &str, to: &str) -> NavigationDescription {
        NavigationDescription::new(url(from).as_str(), url(to).as_str(), NavigationType::Push).unwrap()
    }

    pub fn entry(path: &str, index: i64) -> HistoryEntry {
        HistoryEntry::new(url(path), index)
    }

    pub fn navigate_event(path: &str, index: i64, navigation_type: NavigationType) -> NavigateEvent {
        NavigateEvent {
            destination: entry(path, index),
            navigation_type,
        }
    }

    /// A playlist page and a song page, with artwork shared between them.
    pub fn music_config() -> Config {
        Config::new()
            .base_url(BASE)
            .route("playlist", "/")
            .route("song", "/song/:song_id")
            .route("settings", "/settings")
            .rule(RuleConfig::between("playlist", "song").class("expand"))
            .rule(RuleConfig::to_route("settings").class("pop"))
            .capture("li#song-$(song_id) img", "artwork.art")
            .capture("main.song img", "artwork.art")
            .style("::view-transition-group(.art)", [("animationDuration", "300ms")])
    }

    /// `<ul><li id="song-1"><img></li>...</ul>` with one entry per id.
    pub fn playlist_document(ids: &[&str]) -> Arc<MemoryDocument> {
        let doc = Arc::new(MemoryDocument::new());
        show_playlist(&doc, ids);
        doc
    }

    pub fn show_playlist(doc: &MemoryDocument, ids: &[&str]) -> Vec<NodeId> {
        let items = ids.iter().map(|id| {
            ElementSpec::new("li")
                .id(format!("song-{id}"))
                .child(ElementSpec::new("img").attr("src", format!("/art/{id}.png")))
        });
        doc.replace_children(doc.root_id(), [ElementSpec::new("ul").children(items)])
    }

    pub fn show_song(doc: &MemoryDocument, id: &str) -> Vec<NodeId> {
        doc.replace_children(
            doc.root_id(),
            [ElementSpec::new("main")
                .class("song")
                .attr("data-song", id)
                .child(ElementSpec::new("img").attr("src", format!("/art/{id}.png")))],
        )
    }

    /// Names currently applied, sorted, without element ids.
    pub fn names(doc: &MemoryDocument) -> Vec<String> {
        let mut names: Vec<String> = doc.named_elements().into_iter().map(|(_, name)| name).collect();
        names.sort();
        names
    }

    /// Root classes, sorted.
    pub fn classes(doc: &MemoryDocument) -> Vec<String> {
        let mut classes = doc.root_classes();
        classes.sort();
        classes
    }

    pub fn assert_clean(doc: &MemoryDocument) {
        assert!(doc.root_classes().is_empty(), "classes left: {:?}", doc.root_classes());
        assert!(doc.named_elements().is_empty(), "names left: {:?}", doc.named_elements());
        assert!(doc.stylesheets().is_empty(), "sheets left: {:?}", doc.stylesheets());
    }
}

pub mod host {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use velvette::choreographer::{TransitionHost, UpdateCallback};
    use velvette::transition::{Rejection, SignalLifecycle, SignalTrigger};

    struct PendingUpdate {
        update: UpdateCallback,
        ready: SignalTrigger,
        update_callback_done: SignalTrigger,
    }

    #[derive(Default)]
    struct HostState {
        updates: VecDeque<PendingUpdate>,
        finishers: VecDeque<SignalTrigger>,
        started: usize,
    }

    /// A view transition host stepped by hand.
    ///
    /// Update callbacks are queued until [`run_update`](Self::run_update);
    /// transitions finish on [`finish`](Self::finish) or [`skip`](Self::skip).
    #[derive(Clone)]
    pub struct ManualHost {
        supported: bool,
        cross_document: bool,
        state: Rc<RefCell<HostState>>,
    }

    impl ManualHost {
        pub fn new() -> Self {
            Self {
                supported: true,
                cross_document: false,
                state: Rc::default(),
            }
        }

        pub fn unsupported() -> Self {
            Self {
                supported: false,
                ..Self::new()
            }
        }

        pub fn with_cross_document() -> Self {
            Self {
                cross_document: true,
                ..Self::new()
            }
        }

        pub fn started(&self) -> usize {
            self.state.borrow().started
        }

        pub fn pending_updates(&self) -> usize {
            self.state.borrow().updates.len()
        }

        /// Run the oldest queued update callback and settle the update and
        /// ready checkpoints from its outcome.
        pub async fn run_update(&self) -> Result<(), Rejection> {
            let pending = self
                .state
                .borrow_mut()
                .updates
                .pop_front()
                .expect("no queued update callback");
            let outcome = (pending.update)().await;
            match &outcome {
                Ok(()) => {
                    pending.update_callback_done.resolve();
                    pending.ready.resolve();
                }
                Err(rejection) => {
                    pending.update_callback_done.reject(rejection.reason.clone());
                    pending.ready.reject(rejection.reason.clone());
                }
            }
            outcome
        }

        pub fn finish(&self) {
            let trigger = self.state.borrow_mut().finishers.pop_front().expect("no running transition");
            trigger.resolve();
        }

        pub fn skip(&self) {
            let trigger = self.state.borrow_mut().finishers.pop_front().expect("no running transition");
            trigger.reject("transition skipped");
        }
    }

    impl TransitionHost for ManualHost {
        type Transition = SignalLifecycle;

        fn supports_view_transitions(&self) -> bool {
            self.supported
        }

        fn start_view_transition(&self, update: UpdateCallback) -> SignalLifecycle {
            let (lifecycle, triggers) = SignalLifecycle::manual();
            let mut state = self.state.borrow_mut();
            state.started += 1;
            state.updates.push_back(PendingUpdate {
                update,
                ready: triggers.ready,
                update_callback_done: triggers.update_callback_done,
            });
            state.finishers.push_back(triggers.finished);
            lifecycle
        }

        fn supports_cross_document(&self) -> bool {
            self.cross_document
        }
    }
}
