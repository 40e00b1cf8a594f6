//! [`Document`] implementation over parsed HTML.

use std::collections::{HashMap, HashSet};
use std::iter;

use async_trait::async_trait;
use binday_core::{Document, DocumentError, Element, Key};
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;
use url::Url;

use crate::source::{FetchedPage, PageRequest, PageSource};

const HIDDEN_ATTRIBUTE: &str = "hidden";

/// Tags whose text renders on its own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "li", "main", "nav", "ol", "p", "section", "table", "td", "th", "tr",
    "ul",
];

/// Input types that never contribute a value to a submitted form.
const UNSUBMITTED_INPUT_TYPES: &[&str] = &["button", "file", "image", "reset", "submit"];

/// What a click on an element does to the session.
enum ClickEffect {
    Reveal(Vec<usize>),
    Navigate(PageRequest),
    Nothing,
}

/// One loaded page. Elements are addressed by their position in document order.
struct LoadedPage {
    url: Url,
    html: Html,
    elements: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    revealed: HashSet<usize>,
    values: HashMap<usize, String>,
}

impl LoadedPage {
    fn parse(fetched: FetchedPage) -> Self {
        let html = Html::parse_document(&fetched.body);
        let elements: Vec<NodeId> = html
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().is_element())
            .map(|node| node.id())
            .collect();
        let positions = elements
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();

        Self {
            url: fetched.url,
            html,
            elements,
            positions,
            revealed: HashSet::new(),
            values: HashMap::new(),
        }
    }

    fn element(&self, position: usize) -> Option<ElementRef<'_>> {
        let id = *self.elements.get(position)?;
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn position(&self, node: NodeRef<'_, Node>) -> Option<usize> {
        self.positions.get(&node.id()).copied()
    }

    fn hides(&self, node: NodeRef<'_, Node>) -> bool {
        node.value()
            .as_element()
            .is_some_and(|data| data.attr(HIDDEN_ATTRIBUTE).is_some())
            && !self
                .position(node)
                .is_some_and(|position| self.revealed.contains(&position))
    }

    fn is_visible(&self, element: ElementRef<'_>) -> bool {
        !iter::once(*element)
            .chain(element.ancestors())
            .any(|node| self.hides(node))
    }

    fn position_of_id(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|node_id| {
            self.html
                .tree
                .get(*node_id)
                .and_then(ElementRef::wrap)
                .is_some_and(|element| element.value().id() == Some(id))
        })
    }

    fn select(&self, scope: Option<ElementRef<'_>>, selector: &Selector) -> Vec<usize> {
        let matches: Vec<ElementRef<'_>> = match scope {
            Some(scope) => scope
                .select(selector)
                .filter(|element| element.id() != scope.id())
                .collect(),
            None => self.html.select(selector).collect(),
        };

        matches
            .into_iter()
            .filter(|element| self.is_visible(*element))
            .filter_map(|element| self.position(*element))
            .collect()
    }

    fn text(&self, element: ElementRef<'_>) -> String {
        if !self.is_visible(element) {
            return String::new();
        }
        let mut raw = String::new();
        self.collect_text(*element, &mut raw);
        collapse_whitespace(&raw)
    }

    fn collect_text(&self, node: NodeRef<'_, Node>, out: &mut String) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(data) => {
                    if matches!(data.name(), "script" | "style") || self.hides(child) {
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&data.name());
                    if block {
                        out.push(' ');
                    }
                    self.collect_text(child, out);
                    if block {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    fn title(&self) -> Result<String, DocumentError> {
        let selector = parse_selector("title")?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .map(|title| collapse_whitespace(&title.text().collect::<String>()))
            .unwrap_or_default())
    }

    fn current_value(&self, position: usize, element: ElementRef<'_>) -> String {
        if let Some(value) = self.values.get(&position) {
            return value.clone();
        }
        if element.value().name() == "textarea" {
            return element.text().collect();
        }
        element.value().attr("value").unwrap_or_default().to_owned()
    }

    fn form_fields(&self, form: ElementRef<'_>) -> Vec<(String, String)> {
        form.descendants()
            .filter_map(ElementRef::wrap)
            .filter_map(|field| {
                let data = field.value();
                let name = data.attr("name")?;
                if data.attr("disabled").is_some() {
                    return None;
                }
                let position = self.position(*field)?;
                let value = match data.name() {
                    "input" => {
                        let kind = data.attr("type").unwrap_or("text").to_ascii_lowercase();
                        if UNSUBMITTED_INPUT_TYPES.contains(&kind.as_str()) {
                            return None;
                        }
                        if kind == "checkbox" || kind == "radio" {
                            data.attr("checked")?;
                            data.attr("value").unwrap_or("on").to_owned()
                        } else {
                            self.current_value(position, field)
                        }
                    }
                    "textarea" => self.current_value(position, field),
                    "select" => selected_option(field),
                    _ => return None,
                };
                Some((name.to_owned(), value))
            })
            .collect()
    }

    fn form_request(&self, position: usize) -> Result<PageRequest, DocumentError> {
        let element = self.element(position).ok_or(DocumentError::StaleElement)?;
        let form = iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find(|candidate| candidate.value().name() == "form")
            .ok_or_else(|| DocumentError::Unsupported("submit outside a form".to_owned()))?;

        let fields = self.form_fields(form);
        let mut target = match form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|action| !action.is_empty())
        {
            Some(action) => self.url.join(action)?,
            None => self.url.clone(),
        };
        target.set_fragment(None);

        let post = form
            .value()
            .attr("method")
            .is_some_and(|method| method.eq_ignore_ascii_case("post"));
        if post {
            return Ok(PageRequest::PostForm {
                url: target,
                fields,
            });
        }

        target.set_query(None);
        if !fields.is_empty() {
            target.query_pairs_mut().extend_pairs(&fields);
        }
        Ok(PageRequest::Get(target))
    }

    fn click_effect(&self, position: usize) -> Result<ClickEffect, DocumentError> {
        let element = self.element(position).ok_or(DocumentError::StaleElement)?;
        let data = element.value();

        if let Some(controls) = data.attr("aria-controls") {
            let targets = controls
                .split_whitespace()
                .filter_map(|id| self.position_of_id(id))
                .collect();
            return Ok(ClickEffect::Reveal(targets));
        }

        if let Some(href) = data.attr("href").map(str::trim) {
            if let Some(fragment) = href.strip_prefix('#') {
                return Ok(ClickEffect::Reveal(
                    self.position_of_id(fragment).into_iter().collect(),
                ));
            }
            if href.is_empty() || href.to_ascii_lowercase().starts_with("javascript:") {
                return Ok(ClickEffect::Nothing);
            }
            return Ok(ClickEffect::Navigate(PageRequest::Get(self.url.join(href)?)));
        }

        let submits = match data.name() {
            "button" => data
                .attr("type")
                .is_none_or(|kind| kind.eq_ignore_ascii_case("submit")),
            "input" => data
                .attr("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("submit")),
            _ => false,
        };
        if submits {
            return self.form_request(position).map(ClickEffect::Navigate);
        }

        Ok(ClickEffect::Nothing)
    }
}

fn selected_option(select: ElementRef<'_>) -> String {
    let options: Vec<ElementRef<'_>> = select
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|option| option.value().name() == "option")
        .collect();
    options
        .iter()
        .find(|option| option.value().attr("selected").is_some())
        .or_else(|| options.first())
        .map(|option| match option.value().attr("value") {
            Some(value) => value.to_owned(),
            None => collapse_whitespace(&option.text().collect::<String>()),
        })
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|err| DocumentError::InvalidSelector {
        selector: selector.to_owned(),
        reason: err.to_string(),
    })
}

fn is_text_input(element: ElementRef<'_>) -> bool {
    match element.value().name() {
        "textarea" => true,
        "input" => !element.value().attr("type").is_some_and(|kind| {
            let kind = kind.to_ascii_lowercase();
            kind == "checkbox" || kind == "radio" || UNSUBMITTED_INPUT_TYPES.contains(&kind.as_str())
        }),
        _ => false,
    }
}

/// A browser-like session over static HTML pages.
///
/// Supports the interactions the extractors need without running scripts:
///
/// * elements with the `hidden` attribute, and everything inside them, are invisible to
///   queries until a click reveals them;
/// * a click on an element with `aria-controls` (or an `#id` link) reveals the named
///   elements, a click on any other link navigates to it, and a click on a submit button
///   submits its form;
/// * [`Key::Enter`] on a field submits the enclosing form with typed values.
pub struct HtmlDocument<S> {
    source: S,
    page: Option<LoadedPage>,
    generation: u64,
    closed: bool,
}

impl<S: PageSource> HtmlDocument<S> {
    /// Create a session that loads pages from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            page: None,
            generation: 0,
            closed: false,
        }
    }

    fn page(&self) -> Result<&LoadedPage, DocumentError> {
        if self.closed {
            return Err(DocumentError::Closed);
        }
        self.page.as_ref().ok_or(DocumentError::NoPage)
    }

    fn page_mut(&mut self) -> Result<&mut LoadedPage, DocumentError> {
        if self.closed {
            return Err(DocumentError::Closed);
        }
        self.page.as_mut().ok_or(DocumentError::NoPage)
    }

    fn position(&self, element: Element) -> Result<usize, DocumentError> {
        let page = self.page()?;
        if element.page() != self.generation || page.element(element.node()).is_none() {
            return Err(DocumentError::StaleElement);
        }
        Ok(element.node())
    }

    fn input_position(&self, element: Element) -> Result<usize, DocumentError> {
        let position = self.position(element)?;
        let page = self.page()?;
        match page.element(position) {
            Some(field) if is_text_input(field) => Ok(position),
            Some(field) => Err(DocumentError::Unsupported(format!(
                "<{}> does not take text input",
                field.value().name()
            ))),
            None => Err(DocumentError::StaleElement),
        }
    }

    fn select(
        &self,
        within: Option<Element>,
        selector: &str,
    ) -> Result<Vec<Element>, DocumentError> {
        let compiled = parse_selector(selector)?;
        let page = self.page()?;
        let scope = match within {
            Some(element) => Some(
                page.element(self.position(element)?)
                    .ok_or(DocumentError::StaleElement)?,
            ),
            None => None,
        };

        Ok(page
            .select(scope, &compiled)
            .into_iter()
            .map(|position| Element::new(self.generation, position))
            .collect())
    }

    async fn navigate(&mut self, request: PageRequest) -> Result<(), DocumentError> {
        if self.closed {
            return Err(DocumentError::Closed);
        }
        debug!(url = %request.url(), "navigating");
        let fetched = self.source.fetch(request).await?;
        self.page = Some(LoadedPage::parse(fetched));
        self.generation += 1;
        Ok(())
    }
}

#[async_trait]
impl<S: PageSource> Document for HtmlDocument<S> {
    async fn load(&mut self, url: &Url) -> Result<(), DocumentError> {
        self.navigate(PageRequest::Get(url.clone())).await
    }

    async fn current_url(&mut self) -> Result<Url, DocumentError> {
        Ok(self.page()?.url.clone())
    }

    async fn title(&mut self) -> Result<String, DocumentError> {
        self.page()?.title()
    }

    async fn find_one(
        &mut self,
        within: Option<Element>,
        selector: &str,
    ) -> Result<Element, DocumentError> {
        self.select(within, selector)?
            .into_iter()
            .next()
            .ok_or_else(|| DocumentError::NotFound {
                selector: selector.to_owned(),
            })
    }

    async fn find_all(
        &mut self,
        within: Option<Element>,
        selector: &str,
    ) -> Result<Vec<Element>, DocumentError> {
        self.select(within, selector)
    }

    async fn text_of(&mut self, element: Element) -> Result<String, DocumentError> {
        let position = self.position(element)?;
        let page = self.page()?;
        page.element(position)
            .map(|found| page.text(found))
            .ok_or(DocumentError::StaleElement)
    }

    async fn attribute_of(
        &mut self,
        element: Element,
        name: &str,
    ) -> Result<Option<String>, DocumentError> {
        let position = self.position(element)?;
        let page = self.page()?;
        let found = page.element(position).ok_or(DocumentError::StaleElement)?;
        if name == "value" && is_text_input(found) {
            return Ok(Some(page.current_value(position, found)));
        }
        Ok(found.value().attr(name).map(str::to_owned))
    }

    async fn clear(&mut self, element: Element) -> Result<(), DocumentError> {
        let position = self.input_position(element)?;
        self.page_mut()?.values.insert(position, String::new());
        Ok(())
    }

    async fn type_into(&mut self, element: Element, text: &str) -> Result<(), DocumentError> {
        let position = self.input_position(element)?;
        let page = self.page_mut()?;
        let mut value = match page.element(position) {
            Some(field) => page.current_value(position, field),
            None => return Err(DocumentError::StaleElement),
        };
        value.push_str(text);
        page.values.insert(position, value);
        Ok(())
    }

    async fn submit_keystroke(&mut self, element: Element, key: Key) -> Result<(), DocumentError> {
        let position = self.position(element)?;
        match key {
            Key::Enter => {
                let request = self.page()?.form_request(position)?;
                self.navigate(request).await
            }
        }
    }

    async fn click(&mut self, element: Element) -> Result<(), DocumentError> {
        let position = self.position(element)?;
        let effect = self.page()?.click_effect(position)?;
        match effect {
            ClickEffect::Reveal(targets) => {
                debug!(count = targets.len(), "revealing hidden content");
                self.page_mut()?.revealed.extend(targets);
                Ok(())
            }
            ClickEffect::Navigate(request) => self.navigate(request).await,
            ClickEffect::Nothing => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), DocumentError> {
        self.closed = true;
        self.page = None;
        Ok(())
    }
}
