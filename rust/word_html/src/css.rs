use crate::profile::{CssAction, CssRule, Profile};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

pub trait CssRewriter {
    fn rewrite(&self, input: &str) -> String;
}

struct CompiledRule {
    property: &'static str,
    action: CssAction,
    re: Regex,
}

// Any value up to the end of the declaration. Quotes are only accepted
// inside a parenthesized call such as `url("#f")`, so a match never runs
// past the quote that closes a `style` attribute.
const ANY_VALUE: &str =
    r#"(?:\((?:"[^"<>]*"|'[^'<>]*'|\([^()"'<>{}]*\)|[^()"'<>{}])*\)|[^;"'{}<>(])*"#;

const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-", "-o-"];

fn rule_pattern(rule: &CssRule) -> String {
    let value = rule.value.unwrap_or(ANY_VALUE);
    // `prefix` swallows the rest of a longer hyphenated name so that e.g.
    // `text-transform` never matches the `transform` rule.
    let mut p = String::from(r"(?i)(?P<prefix>[a-z0-9_-]*)(?:");
    p.push_str(rule.property);
    p.push_str(r")\s*:\s*(?:");
    p.push_str(value);
    p.push_str(r#")\s*(?:!\s*important\s*)?(?P<term>;|["'}<]|$)"#);
    p
}

fn compile(rules: &[CssRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .filter_map(|rule| match Regex::new(&rule_pattern(rule)) {
            Ok(re) => Some(CompiledRule {
                property: rule.property,
                action: rule.action,
                re,
            }),
            Err(err) => {
                log::error!("skipping css rule {}: {err}", rule.property);
                None
            }
        })
        .collect()
}

lazy_static! {
    static ref STANDARD_RULES: Vec<CompiledRule> = compile(Profile::Standard.config().css_rules);
    static ref RESTRICTED_RULES: Vec<CompiledRule> =
        compile(Profile::RestrictedCompatibility.config().css_rules);
}

fn is_vendor_prefix(prefix: &str) -> bool {
    let lower = prefix.to_ascii_lowercase();
    VENDOR_PREFIXES.contains(&lower.as_str())
}

pub struct PatternRewriter {
    rules: &'static [CompiledRule],
    margin_top_px: u32,
    margin_bottom_px: u32,
}

impl PatternRewriter {
    pub fn for_profile(profile: Profile) -> Self {
        let config = profile.config();
        let rules: &'static [CompiledRule] = match profile {
            Profile::Standard => &STANDARD_RULES,
            Profile::RestrictedCompatibility => &RESTRICTED_RULES,
        };
        Self {
            rules,
            margin_top_px: config.margin_top_px,
            margin_bottom_px: config.margin_bottom_px,
        }
    }

    fn replacement(&self, action: CssAction) -> String {
        match action {
            CssAction::Delete => String::new(),
            CssAction::MarginTop => format!("margin-top: {}px;", self.margin_top_px),
            CssAction::MarginBottom => format!("margin-bottom: {}px;", self.margin_bottom_px),
        }
    }
}

impl CssRewriter for PatternRewriter {
    fn rewrite(&self, input: &str) -> String {
        let mut out = input.to_string();
        for rule in self.rules {
            let mut hits = 0usize;
            let replaced = rule.re.replace_all(&out, |caps: &Captures| {
                let prefix = caps.name("prefix").map(|m| m.as_str()).unwrap_or("");
                if !prefix.is_empty() && !is_vendor_prefix(prefix) {
                    return caps[0].to_string();
                }
                hits += 1;
                // The terminator is only consumed when it is the declaration's own `;`.
                let term = caps.name("term").map(|m| m.as_str()).unwrap_or("");
                let mut s = self.replacement(rule.action);
                if term != ";" {
                    s.push_str(term);
                }
                s
            });
            let replaced = replaced.into_owned();
            if hits > 0 {
                log::trace!("css rule {} rewrote {hits} declaration(s)", rule.property);
            }
            out = replaced;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(s: &str) -> String {
        PatternRewriter::for_profile(Profile::Standard).rewrite(s)
    }

    fn restricted(s: &str) -> String {
        PatternRewriter::for_profile(Profile::RestrictedCompatibility).rewrite(s)
    }

    #[test]
    fn page_break_before_becomes_top_margin() {
        let out = standard(r#"<p style="page-break-before: always;">A</p>"#);
        assert_eq!(out, r#"<p style="margin-top: 40px;">A</p>"#);

        let out = restricted(r#"<p style="PAGE-BREAK-BEFORE:always">A</p>"#);
        assert_eq!(out, r#"<p style="margin-top: 20px;">A</p>"#);
    }

    #[test]
    fn page_break_after_becomes_bottom_margin_and_inside_is_dropped() {
        let out = standard(r#"<div style="color: red; page-break-after: always; page-break-inside: avoid;">x</div>"#);
        assert!(out.contains("margin-bottom: 40px;"));
        assert!(!out.contains("page-break"));
        assert!(out.contains("color: red;"));
    }

    #[test]
    fn keeps_longer_property_names() {
        let out = standard(r#"<span style="text-transform: uppercase; transform: rotate(3deg);">x</span>"#);
        assert!(out.contains("text-transform: uppercase;"));
        assert!(!out.contains("rotate"));

        let out = standard(r#"<span style="backdrop-filter: blur(2px)">x</span>"#);
        assert!(out.contains("backdrop-filter: blur(2px)"));
    }

    #[test]
    fn vendor_prefixed_transform_is_removed() {
        let out = standard(r#"<span style="-webkit-transform: scale(2); color: blue">x</span>"#);
        assert!(!out.contains("scale(2)"));
        assert!(out.contains("color: blue"));
    }

    #[test]
    fn opacity_only_matches_zero() {
        let out = standard(r#"<i style="opacity: 0.5">a</i><b style="opacity:0;">b</b>"#);
        assert!(out.contains("opacity: 0.5"));
        assert!(out.contains(r#"<b style="">b</b>"#));
    }

    #[test]
    fn position_only_matches_out_of_flow_values() {
        let out = standard(r#"<div style="position: relative; top: 0"><div style="position:absolute !important;">x</div></div>"#);
        assert!(out.contains("position: relative;"));
        assert!(!out.contains("absolute"));
    }

    #[test]
    fn restricted_strips_a_superset() {
        let input = r#"<p style="transition: all 1s; animation-name: spin; visibility: hidden; color: red">x</p>"#;
        let s = standard(input);
        assert!(s.contains("transition: all 1s;"));
        assert!(s.contains("visibility: hidden;"));

        let r = restricted(input);
        assert!(!r.contains("transition"));
        assert!(!r.contains("animation"));
        assert!(!r.contains("visibility"));
        assert!(r.contains("color: red"));
    }

    #[test]
    fn rewrites_style_blocks_too() {
        let out = standard("<style>.a { z-index: 10; box-shadow: 0 0 2px #000 } .b { color: red; }</style>");
        assert!(!out.contains("z-index"));
        assert!(!out.contains("box-shadow"));
        assert!(out.contains(".b { color: red; }"));
    }

    #[test]
    fn quoted_call_arguments_are_removed_with_the_declaration() {
        let out = standard(r##"<p style='filter: url("#f"); color: red'>x</p>"##);
        assert_eq!(out, "<p style=' color: red'>x</p>");

        let out = standard(r#"<div style="color: red; filter: url('#f') blur(1px)">x</div>"#);
        assert_eq!(out, r#"<div style="color: red; ">x</div>"#);

        let out = standard(r#"<i style="transform: translate(calc(1px + 2px))">x</i>"#);
        assert_eq!(out, r#"<i style="">x</i>"#);
    }

    #[test]
    fn declaration_match_stops_at_the_attribute_quote() {
        let out = standard(r#"<p style="z-index: 1" title="keep">x</p>"#);
        assert_eq!(out, r#"<p style="" title="keep">x</p>"#);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let input = r#"<p style="page-break-before: always; filter: blur(1px)">A</p>"#;
        let once = standard(input);
        assert_eq!(standard(&once), once);
    }
}
