use crate::dom::{NodeId, NodeKind, Tree};
use crate::profile::{ProfileConfig, DATA_PREFIX, EVENT_HANDLER_PREFIX, WHITELISTED_DATA_ATTRIBUTE};

fn is_script_url(value: &str) -> bool {
    // Browsers ignore embedded whitespace/control characters in the scheme.
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.starts_with("javascript:") || compact.starts_with("vbscript:")
}

fn keep_attribute(name: &str, value: &str, config: &ProfileConfig) -> bool {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with(EVENT_HANDLER_PREFIX) {
        return false;
    }
    if lower.starts_with(DATA_PREFIX) && lower != WHITELISTED_DATA_ATTRIBUTE {
        return false;
    }
    if config.is_editing_attribute(&lower) {
        return false;
    }
    if matches!(lower.as_str(), "href" | "src" | "action" | "formaction") && is_script_url(value) {
        return false;
    }
    true
}

pub fn clean_class_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect()
}

pub fn remove_forbidden_elements(tree: &mut Tree, config: &ProfileConfig) -> usize {
    let mut removed = 0usize;
    let mut stack: Vec<NodeId> = tree.children(tree.root()).iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let drop = match tree.kind(id) {
            NodeKind::Element { .. } => tree
                .tag(id)
                .map(|t| config.is_forbidden_element(&t))
                .unwrap_or(false),
            NodeKind::Comment(_) => !config.keep_comments,
            NodeKind::Text(_) | NodeKind::Root => false,
        };
        if drop {
            tree.detach(id);
            removed += 1;
            continue;
        }
        stack.extend(tree.children(id).iter().rev().copied());
    }

    removed
}

pub fn sanitize_attributes(tree: &mut Tree, config: &ProfileConfig) -> usize {
    let mut removed = 0usize;
    for id in tree.descendants(tree.root()) {
        let Some(attrs) = tree.attrs_mut(id) else {
            continue;
        };

        let before = attrs.len();
        attrs.retain(|(k, v)| keep_attribute(k, v, config));

        if config.whitelist_class_chars {
            for (k, v) in attrs.iter_mut() {
                if k.eq_ignore_ascii_case("class") {
                    *v = clean_class_value(v);
                }
            }
            attrs.retain(|(k, v)| !(k.eq_ignore_ascii_case("class") && v.trim().is_empty()));
        }

        removed += before - attrs.len();
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    fn run(html: &str, profile: Profile) -> String {
        let config = profile.config();
        let mut tree = Tree::parse_fragment(html);
        remove_forbidden_elements(&mut tree, config);
        sanitize_attributes(&mut tree, config);
        tree.inner_html(tree.root())
    }

    #[test]
    fn drops_forbidden_elements_with_content() {
        let out = run(
            "<div>Hello<script>alert(1)</script><form><input name=a><button>Go</button></form><p>Ok</p></div>",
            Profile::Standard,
        );
        assert_eq!(out, "<div>Hello<p>Ok</p></div>");
    }

    #[test]
    fn drops_media_and_foreign_content() {
        let out = run(
            "<p>a<svg><circle r=1></circle></svg><math><mi>x</mi></math><video src=v></video><canvas></canvas>b</p>",
            Profile::Standard,
        );
        assert_eq!(out, "<p>ab</p>");
    }

    #[test]
    fn style_elements_only_dropped_in_restricted_profile() {
        let html = "<style>p { color: red; }</style><p>x</p>";
        assert!(run(html, Profile::Standard).contains("<style>"));
        assert_eq!(run(html, Profile::RestrictedCompatibility), "<p>x</p>");
    }

    #[test]
    fn comments_only_kept_in_standard_profile() {
        let html = "<p>a<!-- note -->b</p>";
        assert_eq!(run(html, Profile::Standard), html);
        assert_eq!(run(html, Profile::RestrictedCompatibility), "<p>ab</p>");
    }

    #[test]
    fn strips_event_handlers_but_keeps_other_attributes() {
        let out = run(
            r#"<p id="x" onclick="steal()" OnMouseOver="x()" class="lead">t</p>"#,
            Profile::Standard,
        );
        assert_eq!(out, r#"<p id="x" class="lead">t</p>"#);
    }

    #[test]
    fn strips_data_attributes_except_whitelisted_one() {
        let out = run(
            r#"<div data-id="1" data-type="taskList" data-pm-slice="1 1 []">t</div>"#,
            Profile::Standard,
        );
        assert_eq!(out, r#"<div data-type="taskList">t</div>"#);
    }

    #[test]
    fn tabindex_only_stripped_in_restricted_profile() {
        let html = r#"<div contenteditable="true" draggable="true" spellcheck="false" tabindex="0">t</div>"#;
        assert_eq!(run(html, Profile::Standard), r#"<div tabindex="0">t</div>"#);
        assert_eq!(run(html, Profile::RestrictedCompatibility), "<div>t</div>");
    }

    #[test]
    fn class_characters_whitelisted_in_restricted_profile() {
        let html = r#"<span class="foo!bar#baz">t</span>"#;
        assert_eq!(run(html, Profile::Standard), html);
        assert_eq!(
            run(html, Profile::RestrictedCompatibility),
            r#"<span class="foobarbaz">t</span>"#
        );
        assert_eq!(clean_class_value("a-b c_d{}:;"), "a-b c_d");
    }

    #[test]
    fn drops_script_urls() {
        let out = run(
            r#"<a href=" java&#x09;script:alert(1)" title="t">x</a><a href="https://example.com">y</a>"#,
            Profile::Standard,
        );
        assert_eq!(
            out,
            r#"<a title="t">x</a><a href="https://example.com">y</a>"#
        );
    }

    #[test]
    fn counts_removals() {
        let config = Profile::Standard.config();
        let mut tree = Tree::parse_fragment(r#"<p onclick="x" data-a="1">a</p><script>b</script>"#);
        assert_eq!(remove_forbidden_elements(&mut tree, config), 1);
        assert_eq!(sanitize_attributes(&mut tree, config), 2);
    }
}
