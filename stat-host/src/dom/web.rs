//! # Web DOM
//!
//! 基于 `web-sys` 的浏览器文档实现。

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement};

use super::{DomBackend, DomError};

fn js_error(operation: &str, err: JsValue) -> DomError {
    DomError::OperationFailed {
        operation: operation.to_string(),
        message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

/// 浏览器文档
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// 使用全局 `window.document`
    pub fn from_window() -> Result<Self, DomError> {
        let document = web_sys::window()
            .ok_or_else(|| DomError::Unavailable("no global window".to_string()))?
            .document()
            .ok_or_else(|| DomError::Unavailable("window has no document".to_string()))?;
        Ok(Self { document })
    }

    /// 底层 `Document`
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DomBackend for WebDom {
    type Element = Element;

    fn query_by_class(&self, class: &str) -> Vec<Element> {
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn get_attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) -> Result<(), DomError> {
        element
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", e))
    }

    fn set_text(&mut self, element: &Element, text: &str) -> Result<(), DomError> {
        element.set_text_content(Some(text));
        Ok(())
    }

    fn add_class(&mut self, element: &Element, class: &str) -> Result<(), DomError> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| js_error("classList.add", e))
    }

    fn remove_class(&mut self, element: &Element, class: &str) -> Result<(), DomError> {
        element
            .class_list()
            .remove_1(class)
            .map_err(|e| js_error("classList.remove", e))
    }

    fn force_reflow(&mut self, element: &Element) -> Result<(), DomError> {
        // 读取布局属性会刷新挂起的样式变化
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.offset_width();
        } else {
            let _ = element.client_width();
        }
        Ok(())
    }

    fn closest_with_class(&self, element: &Element, class: &str) -> Option<Element> {
        element.closest(&format!(".{class}")).ok().flatten()
    }

    fn is_attached(&self, element: &Element) -> bool {
        element.is_connected()
    }
}
