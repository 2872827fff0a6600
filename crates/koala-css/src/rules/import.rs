//! [CSS Cascade 4 § 2 Importing Style Sheets](https://www.w3.org/TR/css-cascade-4/#at-import)
//!
//! "The @import rule allows users to import style rules from other style
//! sheets." Loading is asynchronous and never fails loudly: a missing loader,
//! a cycle, a network error, or cancellation all leave the import without a
//! style sheet.

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use koala_common::net::{CancelSignal, FetchError, ResourceLoader, fetch_with_cancel};
use koala_common::url::resolve_url;
use koala_common::warning::warn_once;
use url::Url;

use super::{RuleType, StyleSheet};
use crate::media::MediaList;
use crate::node::RuleId;
use crate::parser::CssParserOptions;

/// Everything needed to fetch one import without borrowing the sheet.
struct PendingImport {
    id: RuleId,
    url: Url,
    media: MediaList,
}

/// Where a child sheet sits in the import chain.
#[derive(Clone, Copy)]
struct ImportContext<'a> {
    loader: &'a dyn ResourceLoader,
    document_base: Option<&'a Url>,
    cancel: &'a CancelSignal,
    options: CssParserOptions,
}

impl StyleSheet {
    /// Load the stylesheet of every `@import` at the top of this sheet.
    ///
    /// [§ 2.1 Processing Stylesheet Imports](https://www.w3.org/TR/css-cascade-4/#import-processing)
    ///
    /// "Any @import rules must precede all other valid at-rules and style rules
    /// in a style sheet (ignoring @charset and @layer statement rules) ... or else
    /// the @import rule is invalid."
    ///
    /// Imports are fetched concurrently and each loaded sheet loads its own
    /// imports before this future completes. An import whose URL is this sheet's
    /// or one of its importers' is skipped before any request is made.
    pub fn load_imports<'a>(
        &'a mut self,
        loader: Option<&'a dyn ResourceLoader>,
        document_base: Option<&'a Url>,
        cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, ()> {
        async move {
            let Some(loader) = loader else {
                log::debug!(target: "css", "no resource loader; @import rules stay unresolved");
                return;
            };
            let context = ImportContext {
                loader,
                document_base,
                cancel,
                options: self.parser().options(),
            };
            let pending = self.pending_imports(document_base);
            let ancestry = self.child_ancestry();
            let loads = pending
                .into_iter()
                .map(|import| load_child(import, ancestry.clone(), context));
            for (id, child) in join_all(loads).await.into_iter().flatten() {
                if let Some(data) = self.rules.get_mut(id.0) {
                    data.imported = Some(Box::new(child));
                }
            }
        }
        .boxed()
    }

    /// Load the stylesheet of the single import rule `id`, replacing any sheet
    /// it already holds. Returns whether a sheet was loaded.
    pub fn load_import<'a>(
        &'a mut self,
        id: RuleId,
        loader: Option<&'a dyn ResourceLoader>,
        document_base: Option<&'a Url>,
        cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, bool> {
        async move {
            let Some(loader) = loader else {
                log::debug!(target: "css", "no resource loader; @import rules stay unresolved");
                return false;
            };
            let Some(import) = self.import_target(id, document_base) else {
                return false;
            };
            let context = ImportContext {
                loader,
                document_base,
                cancel,
                options: self.parser().options(),
            };
            let Some((id, child)) = load_child(import, self.child_ancestry(), context).await else {
                return false;
            };
            match self.rules.get_mut(id.0) {
                Some(data) => {
                    data.imported = Some(Box::new(child));
                    true
                }
                None => false,
            }
        }
        .boxed()
    }

    /// Leading imports that still need a sheet. Runs before any fetch.
    fn pending_imports(&self, document_base: Option<&Url>) -> Vec<PendingImport> {
        let mut pending = Vec::new();
        for rule in self.rules() {
            match rule.rule_type() {
                RuleType::Charset => {}
                RuleType::Import if rule.style_sheet().is_none() => {
                    pending.extend(self.import_target(rule.id(), document_base));
                }
                RuleType::Import => {}
                _ => break,
            }
        }
        pending
    }

    /// Resolve the URL of import rule `id` and check it against the import chain.
    fn import_target(&self, id: RuleId, document_base: Option<&Url>) -> Option<PendingImport> {
        let rule = self.rule(id).filter(|rule| rule.rule_type() == RuleType::Import)?;
        let href = rule.href().unwrap_or_default();
        // "resolve the URL relative to the style sheet's location, or the
        // document's base URL for embedded style sheets"
        let Some(url) = resolve_url(href, self.href().or(document_base)) else {
            log::debug!(target: "css", "cannot resolve @import url({href})");
            return None;
        };
        if self.href() == Some(&url) || self.ancestry.contains(&url) {
            log::debug!(target: "css", "skipping cyclic @import of {url}");
            return None;
        }
        Some(PendingImport {
            id,
            url,
            media: rule.media().cloned().unwrap_or_default(),
        })
    }

    /// The import chain a sheet loaded from this one starts with.
    fn child_ancestry(&self) -> Vec<Url> {
        let mut ancestry = self.ancestry.clone();
        ancestry.extend(self.href().cloned());
        ancestry
    }
}

/// Fetch, parse, and recursively load one imported sheet.
async fn load_child(
    import: PendingImport,
    ancestry: Vec<Url>,
    context: ImportContext<'_>,
) -> Option<(RuleId, StyleSheet)> {
    let text = match fetch_with_cancel(context.loader, &import.url, context.cancel).await {
        Ok(text) => text,
        Err(FetchError::Cancelled) => {
            log::debug!(target: "css", "@import of {} cancelled", import.url);
            return None;
        }
        Err(error) => {
            warn_once("css", &format!("failed to load stylesheet {}: {error}", import.url));
            return None;
        }
    };

    let mut child = StyleSheet::new(context.options);
    child.set_href(Some(import.url));
    child.set_media(import.media);
    child.ancestry = ancestry;
    let parser = child.parser();
    parser.fill(&mut child, &text);
    child
        .load_imports(Some(context.loader), context.document_base, context.cancel)
        .await;
    Some((import.id, child))
}
