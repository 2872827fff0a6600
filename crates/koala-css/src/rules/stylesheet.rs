//! [CSSOM § 6.1 CSS Style Sheets](https://www.w3.org/TR/cssom-1/#css-style-sheets)
//!
//! The stylesheet owns every rule parsed into it. Rules refer to each other by
//! [`RuleId`]; attaching and detaching maintain each rule's parent and owner
//! links so the tree and the back-references never disagree.

use core::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

use super::{MatchedRule, RuleData, RuleRef, RuleType};
use crate::condition::ConditionFunction;
use crate::error::CssError;
use crate::format::{StyleFormatter, ToCss};
use crate::media::{MediaList, RenderDevice};
use crate::node::{Container, CssNode, NodeList, NodeListMut, RawString, RawUrl, RuleId};
use crate::parser::{CssParser, CssParserOptions};
use crate::properties::StyleDeclaration;
use crate::selector::{Element, Selector};

static NEXT_SHEET: AtomicUsize = AtomicUsize::new(1);

/// Identifies one stylesheet for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(usize);

/// [CSSOM § 6.1.2 The CSSStyleSheet Interface](https://www.w3.org/TR/cssom-1/#the-cssstylesheet-interface)
#[derive(Debug)]
pub struct StyleSheet {
    id: SheetId,
    /// "location: Specified when created. The absolute-URL string of the first
    /// request of the CSS style sheet or null if the CSS style sheet was embedded."
    href: Option<Url>,
    /// "media: Specified when created. The MediaList object associated with the
    /// CSS style sheet."
    media: MediaList,
    parser: CssParser,
    /// The top-level rules.
    pub(crate) children: Vec<CssNode>,
    /// Every rule ever created in this sheet, attached or not.
    pub(crate) rules: Vec<RuleData>,
    /// Hrefs of the sheets that imported this one, outermost first.
    pub(crate) ancestry: Vec<Url>,
}

impl StyleSheet {
    /// An empty stylesheet whose rules are parsed with `options`.
    #[must_use]
    pub fn new(options: CssParserOptions) -> Self {
        Self {
            id: SheetId(NEXT_SHEET.fetch_add(1, Ordering::Relaxed)),
            href: None,
            media: MediaList::default(),
            parser: CssParser::new(options),
            children: Vec::new(),
            rules: Vec::new(),
            ancestry: Vec::new(),
        }
    }

    /// This sheet's identity.
    #[must_use]
    pub const fn id(&self) -> SheetId {
        self.id
    }

    /// "The href attribute must return the location."
    #[must_use]
    pub const fn href(&self) -> Option<&Url> {
        self.href.as_ref()
    }

    /// Set the location imports are resolved against.
    pub fn set_href(&mut self, href: Option<Url>) {
        self.href = href;
    }

    /// "The media attribute must return the media."
    #[must_use]
    pub const fn media(&self) -> &MediaList {
        &self.media
    }

    /// Replace the media list.
    pub fn set_media(&mut self, media: MediaList) {
        self.media = media;
    }

    /// The parser that re-parses text for in-place mutation.
    #[must_use]
    pub const fn parser(&self) -> CssParser {
        self.parser
    }

    /// The number of top-level rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.values::<RuleId>().count()
    }

    /// True if the sheet has no top-level rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// "The cssRules attribute must return a CSSRuleList object representing
    /// the CSS rules."
    pub fn rules(&self) -> impl Iterator<Item = RuleRef<'_>> {
        self.children.values::<RuleId>().filter_map(|id| self.rule(*id))
    }

    /// The top-level rule at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<RuleRef<'_>> {
        self.rules().nth(index)
    }

    /// A view of the rule `id`, attached or not.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<RuleRef<'_>> {
        self.rules.get(id.0).map(|data| RuleRef::new(self, id, data))
    }

    /// The children of `container`.
    #[must_use]
    pub fn children(&self, container: Container) -> Option<&[CssNode]> {
        match container {
            Container::Sheet => Some(&self.children),
            Container::Rule(id) => self.rules.get(id.0).map(|data| data.children.as_slice()),
        }
    }

    /// Create a detached rule of `rule_type` with default contents.
    pub fn create_rule(&mut self, rule_type: RuleType) -> RuleId {
        self.alloc(rule_type, rule_type.default_children())
    }

    /// Add a detached rule to the table. Nested rules in `children` become
    /// children of the new rule.
    pub(crate) fn alloc(&mut self, rule_type: RuleType, children: Vec<CssNode>) -> RuleId {
        let id = RuleId(self.rules.len());
        for child in children.values::<RuleId>() {
            if let Some(data) = self.rules.get_mut(child.0) {
                data.parent = Some(Container::Rule(id));
            }
        }
        self.rules.push(RuleData::new(rule_type, children));
        id
    }

    /// Append without checks. Used while building a freshly parsed tree.
    pub(crate) fn push_child(&mut self, container: Container, node: CssNode) {
        if let Ok(children) = self.children_mut(container) {
            children.push(node.clone());
            self.wire(container, &node);
        }
    }

    // -----------------------------------------------------------------------
    // Node contract
    // -----------------------------------------------------------------------

    /// [DOM § 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// # Errors
    ///
    /// See [`Self::insert_child`].
    pub fn append_child(&mut self, container: Container, node: CssNode) -> Result<(), CssError> {
        let len = self.children(container).ok_or(CssError::NotFound)?.len();
        self.insert_child(container, len, node)
    }

    /// Insert `node` at child position `index` of `container`.
    ///
    /// # Errors
    ///
    /// - [`CssError::NotFound`] if `container` or the rule in `node` does not exist.
    /// - [`CssError::IndexSize`] if `index` is past the end.
    /// - [`CssError::InUse`] if the rule in `node` is already attached.
    /// - [`CssError::HierarchyRequest`] if the rule would contain itself.
    pub fn insert_child(&mut self, container: Container, index: usize, node: CssNode) -> Result<(), CssError> {
        self.check_attach(container, &node)?;
        let children = self.children_mut(container)?;
        if index > children.len() {
            return Err(CssError::IndexSize {
                index,
                len: children.len(),
            });
        }
        children.insert(index, node.clone());
        self.wire(container, &node);
        Ok(())
    }

    /// Insert `node` before `reference`, or append it when `reference` is `None`.
    ///
    /// # Errors
    ///
    /// [`CssError::NotFound`] if `reference` is not a child of `container`,
    /// plus everything [`Self::insert_child`] reports.
    pub fn insert_before(
        &mut self,
        container: Container,
        node: CssNode,
        reference: Option<&CssNode>,
    ) -> Result<(), CssError> {
        let children = self.children(container).ok_or(CssError::NotFound)?;
        let index = match reference {
            Some(reference) => children
                .iter()
                .position(|child| child == reference)
                .ok_or(CssError::NotFound)?,
            None => children.len(),
        };
        self.insert_child(container, index, node)
    }

    /// Replace `old` with `new`, returning the detached `old`.
    ///
    /// # Errors
    ///
    /// [`CssError::NotFound`] if `old` is not a child of `container`; the
    /// container is left unchanged. Otherwise as [`Self::insert_child`].
    pub fn replace_child(&mut self, container: Container, old: &CssNode, new: CssNode) -> Result<CssNode, CssError> {
        let index = self
            .children(container)
            .ok_or(CssError::NotFound)?
            .iter()
            .position(|child| child == old)
            .ok_or(CssError::NotFound)?;
        if old != &new {
            self.check_attach(container, &new)?;
        }
        let children = self.children_mut(container)?;
        let previous = core::mem::replace(&mut children[index], new.clone());
        self.unwire(&previous);
        self.wire(container, &new);
        Ok(previous)
    }

    /// Detach `node` from `container` and return it.
    ///
    /// # Errors
    ///
    /// [`CssError::NotFound`] if `node` is not a child of `container`.
    pub fn remove_child(&mut self, container: Container, node: &CssNode) -> Result<CssNode, CssError> {
        let children = self.children_mut(container)?;
        let index = children
            .iter()
            .position(|child| child == node)
            .ok_or(CssError::NotFound)?;
        let removed = children.remove(index);
        self.unwire(&removed);
        Ok(removed)
    }

    /// Detach every child of `container`, last first.
    ///
    /// # Errors
    ///
    /// [`CssError::NotFound`] if `container` does not exist.
    pub fn clear(&mut self, container: Container) -> Result<(), CssError> {
        let removed = core::mem::take(self.children_mut(container)?);
        for node in removed.iter().rev() {
            self.unwire(node);
        }
        Ok(())
    }

    fn children_mut(&mut self, container: Container) -> Result<&mut Vec<CssNode>, CssError> {
        match container {
            Container::Sheet => Ok(&mut self.children),
            Container::Rule(id) => self
                .rules
                .get_mut(id.0)
                .map(|data| &mut data.children)
                .ok_or(CssError::NotFound),
        }
    }

    fn check_attach(&self, container: Container, node: &CssNode) -> Result<(), CssError> {
        if let Container::Rule(target) = container
            && self.rules.get(target.0).is_none()
        {
            return Err(CssError::NotFound);
        }
        let CssNode::Rule(id) = node else {
            return Ok(());
        };
        let data = self.rules.get(id.0).ok_or(CssError::NotFound)?;
        if data.parent.is_some() {
            return Err(CssError::InUse);
        }
        // Walk up from the target; meeting the node means it would contain itself.
        let mut current = container;
        while let Container::Rule(ancestor) = current {
            if ancestor == *id {
                return Err(CssError::HierarchyRequest);
            }
            match self.rules.get(ancestor.0).and_then(|data| data.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Ok(())
    }

    fn wire(&mut self, container: Container, node: &CssNode) {
        let CssNode::Rule(id) = node else {
            return;
        };
        let owner = match container {
            Container::Sheet => Some(self.id),
            Container::Rule(parent) => self.rules.get(parent.0).and_then(|data| data.owner),
        };
        if let Some(data) = self.rules.get_mut(id.0) {
            data.parent = Some(container);
        }
        self.set_owner(*id, owner);
    }

    fn unwire(&mut self, node: &CssNode) {
        let CssNode::Rule(id) = node else {
            return;
        };
        if let Some(data) = self.rules.get_mut(id.0) {
            data.parent = None;
        }
        self.set_owner(*id, None);
    }

    /// Set the owner of `root` and every rule nested in it.
    fn set_owner(&mut self, root: RuleId, owner: Option<SheetId>) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some(data) = self.rules.get_mut(id.0) {
                data.owner = owner;
                pending.extend(data.children.values::<RuleId>().copied());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rule lists
    // -----------------------------------------------------------------------

    /// [insertRule()](https://www.w3.org/TR/cssom-1/#dom-cssstylesheet-insertrule)
    ///
    /// Returns `index`.
    ///
    /// # Errors
    ///
    /// - [`CssError::Syntax`] if `text` is not exactly one rule.
    /// - [`CssError::IndexSize`] if `index` is past the end.
    /// - [`CssError::HierarchyRequest`] if the rule cannot sit at `index`.
    /// - [`CssError::InvalidState`] for a namespace rule after other rules.
    pub fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, CssError> {
        self.insert_rule_into(Container::Sheet, text, index)
    }

    /// [deleteRule()](https://www.w3.org/TR/cssom-1/#dom-cssstylesheet-deleterule)
    ///
    /// # Errors
    ///
    /// [`CssError::IndexSize`] if `index` is past the end,
    /// [`CssError::InvalidState`] when removing a namespace rule from a list
    /// that holds other rules.
    pub fn delete_rule(&mut self, index: usize) -> Result<(), CssError> {
        self.delete_rule_from(Container::Sheet, index)
    }

    /// [CSSOM § 6.4.1 Insert a CSS rule](https://www.w3.org/TR/cssom-1/#insert-a-css-rule)
    fn insert_rule_into(&mut self, container: Container, text: &str, index: usize) -> Result<usize, CssError> {
        let in_keyframes = self.container_type(container) == Some(RuleType::Keyframes);
        let parser = self.parser;

        // "Set length to the number of items in list."
        let existing = self.rule_types(container)?;
        // "If index is greater than length, then throw an IndexSizeError exception."
        if index > existing.len() {
            return Err(CssError::IndexSize {
                index,
                len: existing.len(),
            });
        }
        // "Set new rule to the results of performing parse a CSS rule on argument rule."
        // "If new rule is a syntax error, throw a SyntaxError exception."
        let parsed = if in_keyframes {
            parser.parse_keyframe_rule(self, text)
        } else {
            parser.parse_rule(self, text)
        };
        let id = parsed.ok_or_else(|| CssError::Syntax(text.trim().to_string()))?;
        let new_type = self.rules[id.0].rule_type;

        // "If new rule cannot be inserted into list at the zero-index position index
        // due to constraints specified by CSS, then throw a HierarchyRequestError
        // exception."
        let (before, after) = existing.split_at(index);
        let prelude = |t: &RuleType| matches!(t, RuleType::Charset | RuleType::Import | RuleType::Namespace);
        let allowed = match new_type {
            RuleType::Charset | RuleType::Import | RuleType::Namespace if container != Container::Sheet => false,
            RuleType::Charset => before.is_empty() && !existing.contains(&RuleType::Charset),
            RuleType::Import => {
                before.iter().all(|t| matches!(t, RuleType::Charset | RuleType::Import))
                    && !after.iter().any(|t| matches!(t, RuleType::Charset))
            }
            RuleType::Namespace => {
                before.iter().all(prelude) && !after.iter().any(|t| matches!(t, RuleType::Charset | RuleType::Import))
            }
            RuleType::Keyframe => in_keyframes,
            _ => !after.iter().any(prelude),
        };
        if !allowed {
            return Err(CssError::HierarchyRequest);
        }
        // "If new rule is an @namespace at-rule, and list contains anything other
        // than @import at-rules, and @namespace at-rules, throw an InvalidStateError
        // exception."
        if new_type == RuleType::Namespace
            && existing
                .iter()
                .any(|t| !matches!(t, RuleType::Charset | RuleType::Import | RuleType::Namespace))
        {
            return Err(CssError::InvalidState(
                "@namespace must precede all rules other than @charset and @import".to_string(),
            ));
        }

        // "Insert new rule into list at the zero-indexed position index."
        let position = self.child_position(container, index)?;
        self.insert_child(container, position, CssNode::Rule(id))?;
        Ok(index)
    }

    /// [CSSOM § 6.4.1 Remove a CSS rule](https://www.w3.org/TR/cssom-1/#remove-a-css-rule)
    fn delete_rule_from(&mut self, container: Container, index: usize) -> Result<(), CssError> {
        let existing = self.rule_types(container)?;
        // "If index is greater than or equal to length, then throw an IndexSizeError exception."
        let Some(old_type) = existing.get(index) else {
            return Err(CssError::IndexSize {
                index,
                len: existing.len(),
            });
        };
        // "If old rule is an @namespace at-rule, and list contains anything other
        // than @import at-rules, and @namespace at-rules, throw an InvalidStateError
        // exception."
        if *old_type == RuleType::Namespace
            && existing
                .iter()
                .any(|t| !matches!(t, RuleType::Charset | RuleType::Import | RuleType::Namespace))
        {
            return Err(CssError::InvalidState(
                "cannot remove @namespace while style rules depend on it".to_string(),
            ));
        }
        let id = self
            .rule_ids(container)?
            .get(index)
            .copied()
            .ok_or(CssError::IndexSize {
                index,
                len: existing.len(),
            })?;
        self.remove_child(container, &CssNode::Rule(id)).map(drop)
    }

    fn rule_ids(&self, container: Container) -> Result<Vec<RuleId>, CssError> {
        Ok(self
            .children(container)
            .ok_or(CssError::NotFound)?
            .values::<RuleId>()
            .copied()
            .collect())
    }

    fn rule_types(&self, container: Container) -> Result<Vec<RuleType>, CssError> {
        Ok(self
            .rule_ids(container)?
            .into_iter()
            .filter_map(|id| self.rules.get(id.0).map(|data| data.rule_type))
            .collect())
    }

    /// The child position of the `index`th nested rule, or the end of the list.
    fn child_position(&self, container: Container, index: usize) -> Result<usize, CssError> {
        let children = self.children(container).ok_or(CssError::NotFound)?;
        Ok(children
            .iter()
            .enumerate()
            .filter(|(_, child)| matches!(child, CssNode::Rule(_)))
            .nth(index)
            .map_or(children.len(), |(position, _)| position))
    }

    fn container_type(&self, container: Container) -> Option<RuleType> {
        match container {
            Container::Sheet => None,
            Container::Rule(id) => self.rules.get(id.0).map(|data| data.rule_type),
        }
    }

    fn data(&self, id: RuleId) -> Result<&RuleData, CssError> {
        self.rules.get(id.0).ok_or(CssError::NotFound)
    }

    fn data_mut(&mut self, id: RuleId) -> Result<&mut RuleData, CssError> {
        self.rules.get_mut(id.0).ok_or(CssError::NotFound)
    }

    fn grouping(&self, id: RuleId) -> Result<RuleType, CssError> {
        let rule_type = self.data(id)?.rule_type;
        if rule_type.is_grouping() {
            Ok(rule_type)
        } else {
            Err(CssError::InvalidState(format!("a {rule_type} rule has no nested rules")))
        }
    }

    // -----------------------------------------------------------------------
    // Rule mutation
    // -----------------------------------------------------------------------

    /// [cssText setter](https://www.w3.org/TR/cssom-1/#dom-cssrule-csstext)
    ///
    /// Re-parse `text` and, if it is a rule of the same type, move its contents
    /// into `id`. The rule keeps its identity, parent, and owner. On error the
    /// rule is unchanged.
    ///
    /// # Errors
    ///
    /// - [`CssError::NotFound`] if `id` does not exist.
    /// - [`CssError::Syntax`] if `text` is not exactly one rule.
    /// - [`CssError::InvalidModification`] if `text` is a rule of another type.
    pub fn set_css_text(&mut self, id: RuleId, text: &str) -> Result<(), CssError> {
        let expected = self.data(id)?.rule_type;
        let parser = self.parser;
        let parsed = if expected == RuleType::Keyframe {
            parser.parse_keyframe_rule(self, text)
        } else {
            parser.parse_rule(self, text)
        };
        let replacement = parsed.ok_or_else(|| CssError::Syntax(text.trim().to_string()))?;
        let found = self.data(replacement)?.rule_type;
        if found != expected {
            return Err(CssError::InvalidModification { expected, found });
        }

        self.clear(Container::Rule(id))?;
        let incoming = core::mem::take(&mut self.data_mut(replacement)?.children);
        for child in incoming.values::<RuleId>() {
            if let Some(data) = self.rules.get_mut(child.0) {
                data.parent = Some(Container::Rule(id));
            }
        }
        let data = self.data_mut(id)?;
        data.children = incoming;
        data.imported = None;
        let owner = data.owner;
        self.set_owner(id, owner);
        Ok(())
    }

    /// [selectorText setter](https://www.w3.org/TR/cssom-1/#dom-cssstylerule-selectortext)
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if the rule is not a style or page rule,
    /// [`CssError::Syntax`] if `text` is not a selector.
    pub fn set_selector_text(&mut self, id: RuleId, text: &str) -> Result<(), CssError> {
        let rule_type = self.data(id)?.rule_type;
        if !matches!(rule_type, RuleType::Style | RuleType::Page) {
            return Err(CssError::InvalidState(format!("a {rule_type} rule has no selector")));
        }
        let selector = self
            .parser
            .parse_selector(text)
            .ok_or_else(|| CssError::Syntax(text.trim().to_string()))?;
        let children = &mut self.data_mut(id)?.children;
        if children.value::<Selector>().is_some() {
            children.set_value(selector);
        } else {
            children.insert(0, CssNode::Selector(selector));
        }
        Ok(())
    }

    /// The declaration block of `id`, for editing.
    pub fn style_mut(&mut self, id: RuleId) -> Option<&mut StyleDeclaration> {
        self.rules.get_mut(id.0)?.children.value_mut()
    }

    /// Replace the condition of a media, supports, or document rule.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] for any other rule type, [`CssError::Syntax`]
    /// if `text` does not parse as that rule's condition.
    pub fn set_condition_text(&mut self, id: RuleId, text: &str) -> Result<(), CssError> {
        let rule_type = self.data(id)?.rule_type;
        let parser = self.parser;
        let syntax = || CssError::Syntax(text.trim().to_string());
        match rule_type {
            RuleType::Media => {
                let media = parser.parse_media_list(text).ok_or_else(syntax)?;
                self.data_mut(id)?.children.set_value(media);
            }
            RuleType::Supports => {
                let condition = parser
                    .parse_condition(text)
                    .filter(|condition| *condition != ConditionFunction::Empty)
                    .ok_or_else(syntax)?;
                self.data_mut(id)?.children.set_value(condition);
            }
            RuleType::Document => {
                let functions = parser.parse_document_functions(text).ok_or_else(syntax)?;
                let children = &mut self.data_mut(id)?.children;
                children.retain(|child| !matches!(child, CssNode::Document(_)));
                for (index, function) in functions.into_iter().enumerate() {
                    children.insert(index, CssNode::Document(function));
                }
            }
            _ => return Err(CssError::InvalidState(format!("a {rule_type} rule has no condition"))),
        }
        Ok(())
    }

    /// Set the prefix of a namespace rule. An empty prefix declares the default namespace.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a namespace rule or a rule
    /// other than `@charset`, `@import`, or `@namespace` precedes it.
    pub fn set_namespace_prefix(&mut self, id: RuleId, prefix: &str) -> Result<(), CssError> {
        self.check_namespace_position(id)?;
        let children = &mut self.data_mut(id)?.children;
        if prefix.is_empty() {
            let _ = children.remove_value::<RawString>();
        } else if children.value::<RawString>().is_some() {
            children.set_value(RawString(prefix.to_string()));
        } else {
            children.insert(0, CssNode::RawString(RawString(prefix.to_string())));
        }
        Ok(())
    }

    /// Set the namespace URI of a namespace rule.
    ///
    /// # Errors
    ///
    /// As [`Self::set_namespace_prefix`].
    pub fn set_namespace_uri(&mut self, id: RuleId, uri: &str) -> Result<(), CssError> {
        self.check_namespace_position(id)?;
        self.data_mut(id)?.children.set_value(RawUrl(uri.to_string()));
        Ok(())
    }

    fn check_namespace_position(&self, id: RuleId) -> Result<(), CssError> {
        let data = self.data(id)?;
        if data.rule_type != RuleType::Namespace {
            return Err(CssError::InvalidState(format!("a {} rule has no namespace", data.rule_type)));
        }
        let Some(container) = data.parent else {
            return Ok(());
        };
        let siblings = self.rule_ids(container)?;
        let preceding = siblings.iter().take_while(|sibling| **sibling != id);
        for sibling in preceding {
            let sibling_type = self.data(*sibling)?.rule_type;
            if !matches!(sibling_type, RuleType::Charset | RuleType::Import | RuleType::Namespace) {
                return Err(CssError::InvalidState(format!(
                    "@namespace cannot follow a {sibling_type} rule"
                )));
            }
        }
        Ok(())
    }

    /// Create a rule of `rule_type` with default contents and append it to the
    /// grouping rule `id`.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a grouping rule,
    /// [`CssError::HierarchyRequest`] if `rule_type` cannot be nested there.
    pub fn add_new_rule(&mut self, id: RuleId, rule_type: RuleType) -> Result<RuleId, CssError> {
        let container_type = self.grouping(id)?;
        let allowed = if container_type == RuleType::Keyframes {
            rule_type == RuleType::Keyframe
        } else {
            !matches!(
                rule_type,
                RuleType::Charset | RuleType::Import | RuleType::Namespace | RuleType::Keyframe
            )
        };
        if !allowed {
            return Err(CssError::HierarchyRequest);
        }
        let child = self.create_rule(rule_type);
        self.append_child(Container::Rule(id), CssNode::Rule(child))?;
        Ok(child)
    }

    /// [CSSGroupingRule.insertRule()](https://www.w3.org/TR/cssom-1/#dom-cssgroupingrule-insertrule)
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a grouping rule, otherwise as
    /// [`Self::insert_rule`].
    pub fn insert(&mut self, id: RuleId, text: &str, index: usize) -> Result<usize, CssError> {
        let _ = self.grouping(id)?;
        self.insert_rule_into(Container::Rule(id), text, index)
    }

    /// [CSSGroupingRule.deleteRule()](https://www.w3.org/TR/cssom-1/#dom-cssgroupingrule-deleterule)
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a grouping rule,
    /// [`CssError::IndexSize`] if `index` is past the end.
    pub fn remove_at(&mut self, id: RuleId, index: usize) -> Result<(), CssError> {
        let _ = self.grouping(id)?;
        self.delete_rule_from(Container::Rule(id), index)
    }

    /// [CSSKeyframesRule.appendRule()](https://www.w3.org/TR/css-animations-1/#dom-csskeyframesrule-appendrule)
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a keyframes rule,
    /// [`CssError::Syntax`] if `text` is not a keyframe.
    pub fn append_keyframe(&mut self, id: RuleId, text: &str) -> Result<RuleId, CssError> {
        self.check_keyframes(id)?;
        let parser = self.parser;
        let keyframe = parser
            .parse_keyframe_rule(self, text)
            .ok_or_else(|| CssError::Syntax(text.trim().to_string()))?;
        self.append_child(Container::Rule(id), CssNode::Rule(keyframe))?;
        Ok(keyframe)
    }

    /// [CSSKeyframesRule.findRule()](https://www.w3.org/TR/css-animations-1/#dom-csskeyframesrule-findrule)
    ///
    /// "returns the last CSSKeyframeRule in the rules with a keyframe selector
    /// that matches the select argument."
    ///
    /// `key` matches a keyframe whose whole key list is the same after
    /// normalization, so `from, 50%` finds `0%, 50%` but `50%` does not.
    #[must_use]
    pub fn find_keyframe(&self, id: RuleId, key: &str) -> Option<RuleId> {
        let rule = self.rule(id)?;
        if rule.rule_type() != RuleType::Keyframes {
            return None;
        }
        let wanted = self.parser.parse_keyframe_selector(key)?;
        rule.rules()
            .filter(|keyframe| keyframe.key_text() == Some(&wanted))
            .last()
            .map(|keyframe| keyframe.id())
    }

    /// [CSSKeyframesRule.deleteRule()](https://www.w3.org/TR/css-animations-1/#dom-csskeyframesrule-deleterule)
    ///
    /// Returns whether a keyframe was removed.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a keyframes rule.
    pub fn delete_keyframe(&mut self, id: RuleId, key: &str) -> Result<bool, CssError> {
        self.check_keyframes(id)?;
        let Some(keyframe) = self.find_keyframe(id, key) else {
            return Ok(false);
        };
        let _ = self.remove_child(Container::Rule(id), &CssNode::Rule(keyframe))?;
        Ok(true)
    }

    /// Rename a keyframes rule.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidState`] if `id` is not a keyframes rule,
    /// [`CssError::Syntax`] if `name` is empty.
    pub fn set_keyframes_name(&mut self, id: RuleId, name: &str) -> Result<(), CssError> {
        self.check_keyframes(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CssError::Syntax("keyframes name cannot be empty".to_string()));
        }
        self.data_mut(id)?.children.set_value(RawString(name.to_string()));
        Ok(())
    }

    fn check_keyframes(&self, id: RuleId) -> Result<(), CssError> {
        match self.data(id)?.rule_type {
            RuleType::Keyframes => Ok(()),
            other => Err(CssError::InvalidState(format!("a {other} rule has no keyframes"))),
        }
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    /// The style rules that apply to `element`, least specific first and in
    /// source order among equals.
    ///
    /// Media, supports, and document rules are entered only when valid for
    /// `device` and the document `url`; loaded imports only when their media
    /// list matches.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidRegex`] from a `@document regexp()` matcher.
    pub fn matching_style_rules<E: Element>(
        &self,
        element: &E,
        device: &RenderDevice,
        url: Option<&Url>,
    ) -> Result<Vec<MatchedRule<'_>>, CssError> {
        let mut matched = Vec::new();
        collect_matches(self.rules().collect(), element, device, url, &mut matched)?;
        // A stable sort keeps source order among equal specificities.
        matched.sort_by_key(|entry| entry.specificity);
        Ok(matched)
    }
}

fn collect_matches<'a, E: Element>(
    rules: Vec<RuleRef<'a>>,
    element: &E,
    device: &RenderDevice,
    url: Option<&Url>,
    matched: &mut Vec<MatchedRule<'a>>,
) -> Result<(), CssError> {
    for rule in rules {
        match rule.rule_type() {
            RuleType::Style => {
                if let Some(specificity) = rule
                    .selector()
                    .and_then(|selector| selector.matching_specificity(element))
                {
                    matched.push(MatchedRule { rule, specificity });
                }
            }
            RuleType::Import => {
                if let Some(sheet) = rule.style_sheet()
                    && rule.media().is_none_or(|media| media.is_valid(device))
                {
                    collect_matches(sheet.rules().collect(), element, device, url, matched)?;
                }
            }
            RuleType::Media | RuleType::Supports | RuleType::Document => {
                if rule.is_valid(device, url)? {
                    collect_matches(rule.rules().collect(), element, device, url, matched)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

impl ToCss for StyleSheet {
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        let rules: Vec<String> = self.rules().map(|rule| rule.to_css(formatter)).collect();
        formatter.sheet(&rules)
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(CssParserOptions::default())
    }
}
