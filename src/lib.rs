//! # velvette
//!
//! **velvette** choreographs document view transitions from a declarative
//! route table. A navigation is matched against named URL patterns and
//! directional rules; the winning rule decides which root classes, element
//! transition names and pseudo-element styles are applied to the document for
//! the lifetime of the transition.
//!
//! ## Architecture
//!
//! - **[`router`]** - URL patterns, rule expansion and navigation matching
//! - **[`capture`]** - the capture selector language (`[:attr]` bindings and
//!   `$(key)` substitution) and its resolution against a document
//! - **[`style`]** - projection of style templates into a transition stylesheet
//! - **[`transition`]** - the orchestrator that applies and removes all of the
//!   above at the lifecycle checkpoints of one transition
//! - **[`choreographer`]** - the public adapters: programmatic navigations,
//!   intercepted navigation events, cross-document navigations and ad-hoc
//!   extensions
//! - **[`dom`]** - the [`Document`](dom::Document) port plus a headless
//!   in-memory implementation
//! - **[`config`]** - configuration types and YAML/JSON/TOML loading
//! - **[`hot_reload`]** - live reloading of a configuration file
//!
//! ### Transition Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Chor as Choreographer
//!     participant Router as NavRouter
//!     participant Orch as TransitionOrchestrator
//!     participant Host as TransitionHost
//!     participant Doc as Document
//!
//!     App->>Chor: start_navigation(nav, update)
//!     Chor->>Router: find_matching_nav(nav)
//!     Router-->>Chor: MatchResult { from, to, class, params }
//!     Chor->>Host: start_view_transition(update)
//!     Chor->>Orch: start_reserved(params, transition, both)
//!     Orch->>Doc: add old + both classes, name captured elements
//!     Host->>App: update()
//!     Host-->>Orch: update_callback_done
//!     Orch->>Doc: remove old classes and names
//!     Orch->>Doc: add new classes, name captured elements, adopt stylesheet
//!     Host-->>Orch: finished
//!     Orch->>Doc: remove stylesheet, names, new + both classes
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use futures::executor::LocalPool;
//! use futures::task::LocalSpawnExt;
//! use velvette::config::{CompiledConfig, Config, RuleConfig};
//! use velvette::dom::{ElementSpec, MemoryDocument};
//! use velvette::router::{NavigationDescription, NavigationType};
//! use velvette::transition::{Phase, SignalLifecycle, TransitionOrchestrator};
//!
//! let config = Config::new()
//!     .route("home", "https://music.test/")
//!     .route("song", "https://music.test/song/:song_id")
//!     .rule(RuleConfig::between("home", "song").class("expand"))
//!     .capture("li#song$(song_id) img", "artwork");
//! let compiled = CompiledConfig::compile(&config)?;
//!
//! let nav = NavigationDescription::new(
//!     "https://music.test/",
//!     "https://music.test/song/7",
//!     NavigationType::Push,
//! )?;
//! let matched = compiled.router.find_matching_nav(&nav).expect("rule matches");
//!
//! let doc = Arc::new(MemoryDocument::new());
//! doc.append(doc.root_id(), ElementSpec::new("li").id("song7").child(ElementSpec::new("img")));
//!
//! let orchestrator = TransitionOrchestrator::new(Arc::clone(&doc));
//! let (lifecycle, triggers) = SignalLifecycle::manual();
//! let task = orchestrator.start(compiled.transition_params(&matched), &lifecycle, Phase::Both)?;
//! assert!(doc.has_root_class("vt-expand"));
//! assert_eq!(doc.named_elements().len(), 1);
//!
//! let mut pool = LocalPool::new();
//! let handle = pool.spawner().spawn_local_with_handle(task)?;
//! triggers.update_callback_done.resolve();
//! triggers.finished.resolve();
//! pool.run_until(handle)?;
//! assert!(doc.root_classes().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Runtime Considerations
//!
//! Transitions are driven by single-threaded futures (`LocalBoxFuture`), as a
//! browser event loop would drive them. Any local executor works; the tests
//! use `futures::executor::LocalPool`. The compiled configuration itself is
//! `Send + Sync` and can be swapped from a watcher thread.
//!
//! Capture resolution is bounded by `VELVETTE_MAX_CAPTURE_JOBS`; see
//! [`runtime_config`].

pub mod capture;
pub mod choreographer;
pub mod cli;
pub mod config;
pub mod dom;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod style;
pub mod transition;

pub use choreographer::{Choreographer, CrossDocument, Extension, TransitionHost};
pub use config::{load_config, CompiledConfig, Config, ConfigError, RuleConfig};
pub use dom::{Document, MemoryDocument};
pub use ids::SessionId;
pub use router::{MatchResult, NavRouter, NavigationDescription, NavigationType};
pub use transition::{Lifecycle, Phase, TransitionError, TransitionOrchestrator};
