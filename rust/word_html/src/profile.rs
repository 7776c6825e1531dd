use std::fmt;
use std::str::FromStr;

pub const EVENT_HANDLER_PREFIX: &str = "on";

pub const DATA_PREFIX: &str = "data-";

pub const WHITELISTED_DATA_ATTRIBUTE: &str = "data-type";

pub const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "blockquote",
];

pub fn is_block_tag(lower: &str) -> bool {
    BLOCK_TAGS.contains(&lower)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssAction {
    Delete,
    MarginTop,
    MarginBottom,
}

#[derive(Debug, Clone, Copy)]
pub struct CssRule {
    pub property: &'static str,
    pub value: Option<&'static str>,
    pub action: CssAction,
}

const fn rule(property: &'static str, value: Option<&'static str>, action: CssAction) -> CssRule {
    CssRule {
        property,
        value,
        action,
    }
}

const STANDARD_CSS_RULES: &[CssRule] = &[
    rule("page-break-before", Some("always"), CssAction::MarginTop),
    rule("page-break-after", Some("always"), CssAction::MarginBottom),
    rule("page-break-inside", Some("avoid"), CssAction::Delete),
    rule("position", Some("(?:absolute|fixed|sticky)"), CssAction::Delete),
    rule("transform", None, CssAction::Delete),
    rule("z-index", None, CssAction::Delete),
    rule("box-shadow", None, CssAction::Delete),
    rule("filter", None, CssAction::Delete),
    rule("opacity", Some(r"0(?:\.0+)?"), CssAction::Delete),
];

const RESTRICTED_CSS_RULES: &[CssRule] = &[
    rule("page-break-before", Some("always"), CssAction::MarginTop),
    rule("page-break-after", Some("always"), CssAction::MarginBottom),
    rule("page-break-inside", Some("avoid"), CssAction::Delete),
    rule("position", Some("(?:absolute|fixed|sticky)"), CssAction::Delete),
    rule("transform", None, CssAction::Delete),
    rule("z-index", None, CssAction::Delete),
    rule("box-shadow", None, CssAction::Delete),
    rule("filter", None, CssAction::Delete),
    rule("transition(?:-[a-z]+)*", None, CssAction::Delete),
    rule("animation(?:-[a-z]+)*", None, CssAction::Delete),
    rule("opacity", Some(r"0(?:\.0+)?"), CssAction::Delete),
    rule("visibility", Some("hidden"), CssAction::Delete),
];

const STANDARD_FORBIDDEN_ELEMENTS: &[&str] = &[
    "script", "iframe", "embed", "object", "applet", "canvas", "audio", "video", "svg", "math",
    "input", "button", "select", "textarea", "form", "xmp", "noembed", "noframes", "plaintext",
];

const RESTRICTED_FORBIDDEN_ELEMENTS: &[&str] = &[
    "script", "iframe", "embed", "object", "applet", "canvas", "audio", "video", "svg", "math",
    "input", "button", "select", "textarea", "form", "xmp", "noembed", "noframes", "plaintext",
    "style",
];

const STANDARD_EDITING_ATTRIBUTES: &[&str] = &["contenteditable", "draggable", "spellcheck"];

const RESTRICTED_EDITING_ATTRIBUTES: &[&str] =
    &["contenteditable", "draggable", "spellcheck", "tabindex"];

pub const RESET_STYLESHEET: &str = "\
* { position: static !important; transform: none !important; }
";

const STANDARD_STYLESHEET: &str = "\
body { font-family: Calibri, Arial, sans-serif; font-size: 11pt; line-height: 1.15; color: #000000; margin: 1in; }
p { margin: 0 0 8pt 0; }
h1 { font-size: 20pt; margin: 24pt 0 6pt 0; }
h2 { font-size: 16pt; margin: 18pt 0 6pt 0; }
h3 { font-size: 14pt; margin: 14pt 0 4pt 0; }
h4 { font-size: 12pt; margin: 12pt 0 4pt 0; }
h5 { font-size: 11pt; margin: 10pt 0 2pt 0; }
h6 { font-size: 10pt; margin: 10pt 0 2pt 0; }
code { font-family: Consolas, 'Courier New', monospace; background: #f5f5f5; padding: 0 2px; }
pre { font-family: Consolas, 'Courier New', monospace; background: #f5f5f5; padding: 8px; white-space: pre-wrap; }
a { color: #1155cc; text-decoration: underline; }
blockquote { border-left: 3px solid #cccccc; margin: 0; padding-left: 12px; color: #555555; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #dddddd; padding: 4px 6px; vertical-align: top; }
ul, ol { margin: 0; padding-left: 40px; }
li { margin: 0; }
img { max-width: 100%; height: auto; vertical-align: middle; }
";

const RESTRICTED_STYLESHEET: &str = "\
@page WordSection1 { size: 8.5in 11.0in; margin: 1.0in 1.0in 1.0in 1.0in; mso-header-margin: 0.5in; mso-footer-margin: 0.5in; }
body { font-family: Calibri, Arial, sans-serif; font-size: 11pt; line-height: 1.15; color: #000000; mso-fareast-font-family: Calibri; }
p, li, div { margin: 0 0 6pt 0; mso-pagination: widow-orphan; }
h1 { font-size: 16pt; margin: 12pt 0 3pt 0; mso-outline-level: 1; }
h2 { font-size: 14pt; margin: 10pt 0 3pt 0; mso-outline-level: 2; }
h3 { font-size: 12pt; margin: 10pt 0 3pt 0; mso-outline-level: 3; }
h4, h5, h6 { font-size: 11pt; margin: 8pt 0 2pt 0; }
code, pre { font-family: 'Courier New', monospace; }
pre { white-space: pre-wrap; }
a { color: #0563c1; text-decoration: underline; }
blockquote { border-left: solid #cccccc 2.25pt; margin: 0; padding-left: 9pt; }
table { border-collapse: collapse; mso-table-layout-alt: fixed; }
th, td { border: solid #bfbfbf 1.0pt; padding: 2pt 4pt; vertical-align: top; }
ul, ol { margin-top: 0; margin-bottom: 0; }
img { max-width: 100%; height: auto; }
";

const STANDARD_HTML_OPEN: &str = "<html>";

const RESTRICTED_HTML_OPEN: &str = "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
xmlns:w=\"urn:schemas-microsoft-com:office:word\" xmlns=\"http://www.w3.org/TR/REC-html40\">";

const RESTRICTED_HEAD_META: &str = "\
<meta name=\"ProgId\" content=\"Word.Document\">
<meta name=\"Generator\" content=\"Microsoft Word 15\">
<meta name=\"Originator\" content=\"Microsoft Word 15\">
<!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom><w:DoNotOptimizeForBrowser/></w:WordDocument></xml><![endif]-->
";

#[derive(Debug)]
pub struct ProfileConfig {
    pub name: &'static str,
    pub css_rules: &'static [CssRule],
    pub forbidden_elements: &'static [&'static str],
    pub editing_attributes: &'static [&'static str],
    pub margin_top_px: u32,
    pub margin_bottom_px: u32,
    pub whitelist_class_chars: bool,
    pub keep_comments: bool,
    pub html_open: &'static str,
    pub head_meta: &'static str,
    pub stylesheet: &'static str,
}

impl ProfileConfig {
    pub fn is_forbidden_element(&self, lower: &str) -> bool {
        self.forbidden_elements.contains(&lower)
    }

    pub fn is_editing_attribute(&self, lower: &str) -> bool {
        self.editing_attributes.contains(&lower)
    }
}

static STANDARD: ProfileConfig = ProfileConfig {
    name: "standard",
    css_rules: STANDARD_CSS_RULES,
    forbidden_elements: STANDARD_FORBIDDEN_ELEMENTS,
    editing_attributes: STANDARD_EDITING_ATTRIBUTES,
    margin_top_px: 40,
    margin_bottom_px: 40,
    whitelist_class_chars: false,
    keep_comments: true,
    html_open: STANDARD_HTML_OPEN,
    head_meta: "",
    stylesheet: STANDARD_STYLESHEET,
};

static RESTRICTED: ProfileConfig = ProfileConfig {
    name: "restricted",
    css_rules: RESTRICTED_CSS_RULES,
    forbidden_elements: RESTRICTED_FORBIDDEN_ELEMENTS,
    editing_attributes: RESTRICTED_EDITING_ATTRIBUTES,
    margin_top_px: 20,
    margin_bottom_px: 20,
    whitelist_class_chars: true,
    keep_comments: false,
    html_open: RESTRICTED_HTML_OPEN,
    head_meta: RESTRICTED_HEAD_META,
    stylesheet: RESTRICTED_STYLESHEET,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    #[default]
    Standard,
    RestrictedCompatibility,
}

impl Profile {
    pub fn from_compat_mode(compat: bool) -> Self {
        if compat {
            Profile::RestrictedCompatibility
        } else {
            Profile::Standard
        }
    }

    pub fn config(self) -> &'static ProfileConfig {
        match self {
            Profile::Standard => &STANDARD,
            Profile::RestrictedCompatibility => &RESTRICTED,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().name)
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Ok(Profile::Standard),
            "restricted" | "compat" | "compatibility" | "sharepoint" => {
                Ok(Profile::RestrictedCompatibility)
            }
            other => Err(format!("unknown profile: {other}")),
        }
    }
}
