//! Breadth-first capture resolution.

use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::selector::SelectorProgram;
use super::template::{GeneratedName, Template};
use crate::dom::Document;
use crate::router::Params;
use crate::runtime_config::DEFAULT_MAX_CAPTURE_JOBS;

/// A capture declaration: which elements to name, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSpec {
    selector: Template,
    name: Template,
}

impl CaptureSpec {
    #[must_use]
    pub fn new(selector: &str, name: &str) -> Self {
        Self {
            selector: Template::parse(selector),
            name: Template::parse(name),
        }
    }

    #[must_use]
    pub fn selector(&self) -> &Template {
        &self.selector
    }

    #[must_use]
    pub fn name(&self) -> &Template {
        &self.name
    }
}

/// An element picked by a capture, with its generated transition name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCapture<E> {
    pub element: E,
    pub name: String,
    pub tags: SmallVec<[String; 2]>,
}

struct Job<E> {
    step: usize,
    root: E,
    params: Params,
}

/// Expands capture specs against a document.
///
/// Resolution does not touch the document; the transition session applies
/// the returned names.
pub struct CaptureResolver<'d, D: Document> {
    document: &'d D,
    max_jobs: usize,
}

impl<'d, D: Document> CaptureResolver<'d, D> {
    #[must_use]
    pub fn new(document: &'d D) -> Self {
        Self {
            document,
            max_jobs: DEFAULT_MAX_CAPTURE_JOBS,
        }
    }

    /// Cap on the number of jobs one capture may process.
    #[must_use]
    pub fn max_jobs(mut self, max_jobs: usize) -> Self {
        self.max_jobs = max_jobs.max(1);
        self
    }

    /// Resolve every spec in declaration order.
    pub fn resolve_all(&self, specs: &[CaptureSpec], params: &Params) -> Vec<ResolvedCapture<D::Element>> {
        specs.iter().flat_map(|spec| self.resolve(spec, params)).collect()
    }

    /// Resolve one capture.
    ///
    /// `params` substitute into the selector template up front; attribute
    /// bindings then fill keys still unset, per branch, before the name is
    /// rendered. A route param or an outer binding is never overwritten.
    /// Malformed or unsupported selectors are logged and yield nothing.
    pub fn resolve(&self, spec: &CaptureSpec, params: &Params) -> Vec<ResolvedCapture<D::Element>> {
        let selector = spec.selector.render(params);
        let program = match SelectorProgram::parse(&selector) {
            Ok(program) => program,
            Err(e) => {
                warn!(selector = %selector, error = %e, "Skipping malformed capture selector");
                return Vec::new();
            }
        };

        let mut resolved = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(Job {
            step: 0,
            root: self.document.root(),
            params: params.clone(),
        });
        let mut processed = 0usize;

        while let Some(job) = queue.pop_front() {
            if processed >= self.max_jobs {
                warn!(
                    selector = %selector,
                    max_jobs = self.max_jobs,
                    pending = queue.len() + 1,
                    "Capture job limit reached, dropping remaining jobs"
                );
                break;
            }
            processed += 1;

            if let Some(bind) = program.binds.get(job.step) {
                let matches = if bind.prefix.is_empty() {
                    vec![job.root.clone()]
                } else {
                    match self.document.query_all(&job.root, &bind.prefix) {
                        Ok(found) => found,
                        Err(e) => {
                            warn!(selector = %bind.prefix, error = %e, "Skipping capture job");
                            continue;
                        }
                    }
                };
                for element in matches {
                    let mut params = job.params.clone();
                    if let Some(value) = self.document.attribute(&element, &bind.attribute) {
                        params.entry(bind.attribute.clone()).or_insert(value);
                    }
                    queue.push_back(Job {
                        step: job.step + 1,
                        root: element,
                        params,
                    });
                }
                continue;
            }

            let elements = if program.terminal.is_empty() {
                vec![job.root]
            } else {
                match self.document.query_all(&job.root, &program.terminal) {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(selector = %program.terminal, error = %e, "Skipping capture job");
                        continue;
                    }
                }
            };
            for element in elements {
                let GeneratedName { name, tags } = GeneratedName::parse(&spec.name.render(&job.params));
                resolved.push(ResolvedCapture { element, name, tags });
            }
        }

        debug!(
            selector = %selector,
            jobs = processed,
            captured = resolved.len(),
            "Capture resolved"
        );
        resolved
    }
}
