//! Named page regions and out-of-order delivery markup.
//!
//! In place, a region is a `<div data-region>` wrapper. When its content is
//! not ready at shell time the wrapper holds a loading placeholder, and the
//! final content arrives later as a `<template data-region-for>` followed by
//! a call that swaps it into the placeholder.

use crate::escape::escape_html;

/// How regions are delivered relative to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionDelivery {
    /// Final content is written in place, in declaration order.
    #[default]
    InPlace,
    /// Placeholders are written in place; content follows as each settles.
    OutOfOrder,
}

impl RegionDelivery {
    /// Whether the swap script must be included in the page.
    pub fn needs_swap_script(&self) -> bool {
        matches!(self, Self::OutOfOrder)
    }
}

/// Name of the global swap function defined by [`swap_script`].
pub const SWAP_FN: &str = "__nwSwap";

/// Inline script defining the placeholder swap function.
pub fn swap_script() -> String {
    format!(
        r#"function {f}(id) {{
  var tpl = document.querySelector('template[data-region-for="' + id + '"]');
  var slot = document.querySelector('[data-region="' + id + '"]');
  if (!tpl || !slot) return;
  slot.replaceChildren(tpl.content.cloneNode(true));
  slot.removeAttribute('aria-busy');
  tpl.remove();
}}"#,
        f = SWAP_FN
    )
}

/// A named, independently delivered part of the page.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    /// HTML shown until the content arrives.
    pub fallback: String,
}

impl Region {
    /// Create a region with a default "Loading <name>..." fallback.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let fallback = loading_card(&format!("Loading {}...", name));
        Self { name, fallback }
    }

    pub fn with_fallback(mut self, html: impl Into<String>) -> Self {
        self.fallback = html.into();
        self
    }

    /// The in-place wrapper holding the final content.
    pub fn render_in_place(&self, content: &str) -> String {
        format!(
            r#"<div data-region="{}">{}</div>"#,
            escape_html(&self.name),
            content
        )
    }

    /// The in-place wrapper holding the loading fallback.
    pub fn render_placeholder(&self) -> String {
        format!(
            r#"<div data-region="{}" aria-busy="true">{}</div>"#,
            escape_html(&self.name),
            self.fallback
        )
    }

    /// The late chunk carrying the final content and the swap call.
    pub fn render_deferred(&self, content: &str) -> String {
        let name = escape_html(&self.name);
        format!(
            r#"<template data-region-for="{name}">{content}</template><script>{f}("{name}")</script>"#,
            name = name,
            content = content,
            f = SWAP_FN
        )
    }
}

/// Default loading card markup.
pub fn loading_card(message: &str) -> String {
    format!(
        r#"<div class="card loading"><p>{}</p></div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_and_deferred_pair_up() {
        let region = Region::new("customers");
        let placeholder = region.render_placeholder();
        assert!(placeholder.starts_with(r#"<div data-region="customers" aria-busy="true">"#));
        assert!(placeholder.contains("Loading customers..."));

        let late = region.render_deferred("<table></table>");
        assert_eq!(
            late,
            r#"<template data-region-for="customers"><table></table></template><script>__nwSwap("customers")</script>"#
        );
    }

    #[test]
    fn test_in_place_and_custom_fallback() {
        let region = Region::new("order").with_fallback("<p>wait</p>");
        assert_eq!(
            region.render_in_place("<p>done</p>"),
            r#"<div data-region="order"><p>done</p></div>"#
        );
        assert!(region.render_placeholder().contains("<p>wait</p>"));
    }

    #[test]
    fn test_swap_script_defines_function() {
        assert!(swap_script().starts_with("function __nwSwap(id)"));
        assert!(RegionDelivery::OutOfOrder.needs_swap_script());
        assert!(!RegionDelivery::InPlace.needs_swap_script());
    }
}
