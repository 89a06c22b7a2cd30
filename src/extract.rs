//! Structural field extraction.
//!
//! Markup on the scraped sites is not a contract: class names get shuffled,
//! attributes disappear. Every field is therefore described as a
//! [`FieldChain`], an ordered list of [`Strategy`]s tried in turn. The first
//! strategy that lands on an element with non-empty text wins; when none
//! does, the chain's default is used. Nothing in here fails on missing
//! markup.

use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Selector};

/// Compile a CSS selector, reporting failures as [`ExtractionError`].
pub fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Text of `element` with every text node trimmed, empty ones dropped, and
/// the rest concatenated.
pub fn strip_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Predicate on an element's attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Any,
    /// `class` contains every needle as a substring.
    ClassAll(&'static [&'static str]),
    /// `class` contains at least one needle as a substring.
    ClassAny(&'static [&'static str]),
    /// `attr` contains at least one needle. With `fold_case` both sides are
    /// lowercased first.
    AttrAny {
        attr: &'static str,
        needles: &'static [&'static str],
        fold_case: bool,
    },
}

impl Match {
    pub fn test(&self, element: ElementRef<'_>) -> bool {
        let attrs = element.value();
        match *self {
            Match::Any => true,
            Match::ClassAll(needles) => attrs
                .attr("class")
                .is_some_and(|c| needles.iter().all(|n| c.contains(n))),
            Match::ClassAny(needles) => attrs
                .attr("class")
                .is_some_and(|c| needles.iter().any(|n| c.contains(n))),
            Match::AttrAny {
                attr,
                needles,
                fold_case,
            } => attrs
                .attr(attr)
                .is_some_and(|value| contains_any(value, needles, fold_case)),
        }
    }
}

/// Whether `haystack` contains any of `needles`.
pub fn contains_any(haystack: &str, needles: &[&str], fold_case: bool) -> bool {
    if fold_case {
        let haystack = haystack.to_lowercase();
        needles
            .iter()
            .any(|n| haystack.contains(n.to_lowercase().as_str()))
    } else {
        needles.iter().any(|n| haystack.contains(n))
    }
}

/// One way of finding a field inside an item node.
#[derive(Debug)]
pub struct Strategy {
    scope: Selector,
    predicate: Match,
    nested: Option<Selector>,
}

impl Strategy {
    /// Elements matching `css` and `predicate`, text read from the element
    /// itself.
    pub fn new(css: &str, predicate: Match) -> Result<Self, ExtractionError> {
        Ok(Self {
            scope: selector(css)?,
            predicate,
            nested: None,
        })
    }

    /// Read the text of the first descendant matching `css` instead of the
    /// element itself.
    pub fn then(mut self, css: &str) -> Result<Self, ExtractionError> {
        self.nested = Some(selector(css)?);
        Ok(self)
    }

    /// The first element under `node` satisfying this strategy, if any.
    pub fn find<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let hit = node.select(&self.scope).find(|e| self.predicate.test(*e))?;
        match &self.nested {
            Some(nested) => hit.select(nested).next(),
            None => Some(hit),
        }
    }

    /// Stripped text of the element this strategy finds; empty on a miss.
    pub fn text(&self, node: ElementRef<'_>) -> String {
        self.find(node).map(strip_text).unwrap_or_default()
    }
}

/// An ordered fallback chain for a single text field.
#[derive(Debug)]
pub struct FieldChain {
    strategies: Vec<Strategy>,
    default: &'static str,
}

impl FieldChain {
    /// Create a chain that tries `strategies` in order and falls back to an
    /// empty string.
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            default: "",
        }
    }

    /// Replace the value used when every strategy misses.
    pub fn or_default(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    /// Resolve this field for one item node.
    ///
    /// # Arguments
    ///
    /// * `node` - The item element to search under (not including itself)
    ///
    /// # Returns
    ///
    /// The stripped text of the first strategy that finds non-empty text, or
    /// the chain's default. Never fails and never mutates `node`.
    pub fn resolve(&self, node: ElementRef<'_>) -> String {
        self.strategies
            .iter()
            .map(|s| s.text(node))
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| self.default.to_string())
    }
}

/// Children of the first `container` in `document` that match `item`, in
/// document order. A missing container yields no items.
pub fn locate_items<'a>(
    document: &'a Html,
    container: &Selector,
    item: &Selector,
) -> Vec<ElementRef<'a>> {
    let Some(list) = document.select(container).next() else {
        return Vec::new();
    };
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| item.matches(child))
        .collect()
}

/// First element under `node` matching `anchors` whose `href` is non-empty.
pub fn first_href(node: ElementRef<'_>, anchors: &Selector) -> Option<String> {
    node.select(anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}
