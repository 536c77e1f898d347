//! Document and element access

use std::any::Any;
use std::rc::Rc;

use cloudstore::platform::{Dom, Element, ElementSpec};
use cloudstore::{PlatformError, PlatformResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, HtmlElement, HtmlImageElement, HtmlInputElement, SvgElement};

use super::js_error;

pub struct WebElement {
    element: web_sys::Element,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &web_sys::Element {
        &self.element
    }

    /// Downcast a trait object created by this binding
    pub fn unwrap_ref(element: &Rc<dyn Element>) -> Option<&web_sys::Element> {
        element
            .as_any()
            .downcast_ref::<WebElement>()
            .map(WebElement::element)
    }

    fn style(&self) -> Option<CssStyleDeclaration> {
        if let Some(html) = self.element.dyn_ref::<HtmlElement>() {
            Some(html.style())
        } else {
            self.element.dyn_ref::<SvgElement>().map(SvgElement::style)
        }
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        let _ = self.element.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.element.class_list().remove_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn set_class_name(&self, class_name: &str) {
        self.element.set_class_name(class_name);
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(style) = self.style() else { return };
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn set_inner_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn value(&self) -> String {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn focus(&self) {
        if let Some(html) = self.element.dyn_ref::<HtmlElement>() {
            let _ = html.focus();
        }
    }

    fn remove(&self) {
        self.element.remove();
    }

    fn clear_onclick(&self) {
        let _ = self.element.remove_attribute("onclick");
        if let Some(html) = self.element.dyn_ref::<HtmlElement>() {
            html.set_onclick(None);
        }
    }

    fn is_complete(&self) -> bool {
        self.element
            .dyn_ref::<HtmlImageElement>()
            .map(HtmlImageElement::complete)
            .unwrap_or(true)
    }

    fn on_load(&self, callback: Box<dyn FnOnce()>) {
        let listener = Closure::once_into_js(move || callback());
        let _ = self
            .element
            .add_event_listener_with_callback("load", listener.unchecked_ref());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct WebDom {
    document: Document,
    body: HtmlElement,
}

impl WebDom {
    pub fn new(document: Document) -> PlatformResult<Self> {
        let body = document.body().ok_or(PlatformError::Unsupported("document.body"))?;
        Ok(Self { document, body })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn wrap(element: web_sys::Element) -> Rc<dyn Element> {
        Rc::new(WebElement::new(element))
    }
}

impl Dom for WebDom {
    fn query(&self, selector: &str) -> Option<Rc<dyn Element>> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(Self::wrap)
    }

    fn query_all(&self, selector: &str) -> Vec<Rc<dyn Element>> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(Self::wrap)
            .collect()
    }

    fn body(&self) -> Rc<dyn Element> {
        let body: &web_sys::Element = self.body.as_ref();
        Self::wrap(body.clone())
    }

    fn append_to_body(&self, spec: &ElementSpec) -> PlatformResult<Rc<dyn Element>> {
        let element = self.document.create_element(&spec.tag).map_err(js_error)?;
        if let Some(id) = &spec.id {
            element.set_id(id);
        }
        if let Some(class_name) = &spec.class_name {
            element.set_class_name(class_name);
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        if let Some(html) = &spec.inner_html {
            element.set_inner_html(html);
        }
        self.body.append_child(&element).map_err(js_error)?;
        Ok(Self::wrap(element))
    }
}
