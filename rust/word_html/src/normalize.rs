use crate::css::{CssRewriter, PatternRewriter};
use crate::document::assemble;
use crate::dom::Tree;
use crate::profile::Profile;
use crate::sanitize::{remove_forbidden_elements, sanitize_attributes};
use crate::spacing::insert_block_breaks;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub removed_elements: usize,
    pub removed_attributes: usize,
    pub inserted_breaks: usize,
}

pub struct Normalizer {
    profile: Profile,
    css: Box<dyn CssRewriter>,
}

impl Normalizer {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            css: Box::new(PatternRewriter::for_profile(profile)),
        }
    }

    pub fn with_css_rewriter(profile: Profile, css: Box<dyn CssRewriter>) -> Self {
        Self { profile, css }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn sanitize_fragment(&self, raw_html: &str) -> String {
        self.sanitize_with_report(raw_html).0
    }

    pub fn sanitize_with_report(&self, raw_html: &str) -> (String, NormalizeReport) {
        let config = self.profile.config();

        let cleaned = self.css.rewrite(raw_html);
        let mut tree = Tree::parse_fragment(&cleaned);

        let report = NormalizeReport {
            removed_elements: remove_forbidden_elements(&mut tree, config),
            removed_attributes: sanitize_attributes(&mut tree, config),
            inserted_breaks: insert_block_breaks(&mut tree),
        };
        log::debug!(
            "normalized {} bytes ({}): {} node(s) removed, {} attribute(s) removed, {} break(s) inserted",
            raw_html.len(),
            self.profile,
            report.removed_elements,
            report.removed_attributes,
            report.inserted_breaks
        );

        (tree.inner_html(tree.root()), report)
    }

    pub fn normalize(&self, raw_html: &str) -> String {
        self.normalize_with_report(raw_html).0
    }

    pub fn normalize_with_report(&self, raw_html: &str) -> (String, NormalizeReport) {
        let (body, report) = self.sanitize_with_report(raw_html);
        (assemble(&body, self.profile.config()), report)
    }
}

pub fn normalize(raw_html: &str, profile: Profile) -> String {
    Normalizer::new(profile).normalize(raw_html)
}

pub fn sanitize_fragment(raw_html: &str, profile: Profile) -> String {
    Normalizer::new(profile).sanitize_fragment(raw_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::body_region;

    struct Uppercase;

    impl CssRewriter for Uppercase {
        fn rewrite(&self, input: &str) -> String {
            input.replace("a", "A")
        }
    }

    #[test]
    fn runs_all_stages_in_order() {
        let html = r#"<div style="page-break-before: always" onclick="x()"><p>a</p><script>bad()</script></div>"#;
        let (doc, report) = Normalizer::new(Profile::Standard).normalize_with_report(html);
        let body = body_region(&doc).unwrap_or_default();
        assert_eq!(
            body,
            "<div style=\"margin-top: 40px;\"><p>a</p>\n</div>\n"
        );
        assert_eq!(
            report,
            NormalizeReport {
                removed_elements: 1,
                removed_attributes: 1,
                inserted_breaks: 2,
            }
        );
    }

    #[test]
    fn css_pass_is_replaceable() {
        let n = Normalizer::with_css_rewriter(Profile::Standard, Box::new(Uppercase));
        assert_eq!(n.sanitize_fragment("<b>abc</b>"), "<b>Abc</b>");
        assert_eq!(n.profile(), Profile::Standard);
    }

    #[test]
    fn css_runs_before_parsing() {
        // The forbidden-element pass sees the style block only after its CSS was cleaned.
        let out = sanitize_fragment(
            "<style>.x { position: fixed; color: red; }</style><p class=\"x\">t</p>",
            Profile::Standard,
        );
        assert!(out.contains("<style>.x {  color: red; }</style>"));
    }

    #[test]
    fn free_functions_match_normalizer() {
        let html = "<h1>t</h1><p>b</p>";
        assert_eq!(
            normalize(html, Profile::RestrictedCompatibility),
            Normalizer::new(Profile::RestrictedCompatibility).normalize(html)
        );
    }
}
