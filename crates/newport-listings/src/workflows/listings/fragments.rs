use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

static UNIT_ITEM_SELECTOR: OnceLock<Selector> = OnceLock::new();
static LABELLED_BUTTON_SELECTOR: OnceLock<Selector> = OnceLock::new();

fn unit_item_selector() -> &'static Selector {
    UNIT_ITEM_SELECTOR.get_or_init(|| {
        Selector::parse("div[class*=unit-list-item]").expect("unit item selector parses")
    })
}

fn labelled_button_selector() -> &'static Selector {
    LABELLED_BUTTON_SELECTOR
        .get_or_init(|| Selector::parse("button[aria-label]").expect("button selector parses"))
}

/// Where the unit sentence is read from inside each listing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentSource {
    /// Text content of the listing element.
    TextContent,
    /// `aria-label` of the listing's button.
    #[default]
    AriaLabel,
}

impl FragmentSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TextContent => "text",
            Self::AriaLabel => "aria-label",
        }
    }
}

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FragmentSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "text-content" | "text_content" => Ok(Self::TextContent),
            "aria" | "aria-label" | "aria_label" => Ok(Self::AriaLabel),
            other => Err(format!(
                "unknown fragment source '{other}' (expected 'text' or 'aria-label')"
            )),
        }
    }
}

/// Pulls one raw sentence per listing element out of a unit-list page.
pub fn extract_fragments(body: &str, source: FragmentSource) -> Vec<String> {
    let document = Html::parse_fragment(body);
    let selector = unit_item_selector();

    document
        .select(selector)
        .filter(|element| !nested_in_unit_item(element, selector))
        .map(|element| match source {
            FragmentSource::TextContent => element_text(&element),
            FragmentSource::AriaLabel => aria_label(&element).unwrap_or_else(|| {
                warn!("listing element has no labelled button, reading its text instead");
                element_text(&element)
            }),
        })
        .collect()
}

fn nested_in_unit_item(element: &ElementRef<'_>, selector: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn aria_label(element: &ElementRef<'_>) -> Option<String> {
    element
        .select(labelled_button_selector())
        .filter_map(|button| button.value().attr("aria-label"))
        .map(str::trim)
        .find(|label| !label.is_empty())
        .map(str::to_string)
}
