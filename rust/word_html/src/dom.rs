use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

// Detached nodes stay allocated but are unreachable from the root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

fn find_elem(node: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: q, .. } = &node.data {
        if q.local.to_string().eq_ignore_ascii_case(name) {
            return Some(node.clone());
        }
    }
    for c in node.children.borrow().iter() {
        if let Some(x) = find_elem(c, name) {
            return Some(x);
        }
    }
    None
}

fn elem_tag_lower(h: &Handle) -> Option<String> {
    match &h.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

// Only these are written unescaped; text of any other element is escaped
// even when the parser read it as raw text (xmp, noembed, noscript).
fn is_raw_text(tag: &str) -> bool {
    matches!(tag.to_ascii_lowercase().as_str(), "style" | "script")
}

// The parser drops one leading newline inside these.
fn drops_leading_newline(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "pre" | "textarea" | "listing"
    )
}

pub fn esc_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
        }
    }

    pub fn parse_fragment(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        let mut tree = Tree::new();
        let root = tree.root();

        if let Some(head) = find_elem(&dom.document, "head") {
            for c in head.children.borrow().iter() {
                if elem_tag_lower(c).as_deref() == Some("style") {
                    tree.copy_from_rcdom(c, root);
                }
            }
        }

        let top = find_elem(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
        for c in top.children.borrow().iter() {
            tree.copy_from_rcdom(c, root);
        }
        tree
    }

    // Iterative so that pathological nesting cannot exhaust the stack.
    fn copy_from_rcdom(&mut self, handle: &Handle, parent: NodeId) {
        let mut stack: Vec<(Handle, NodeId)> = vec![(handle.clone(), parent)];
        while let Some((h, parent)) = stack.pop() {
            let kind = match &h.data {
                NodeData::Text { contents } => NodeKind::Text(contents.borrow().to_string()),
                NodeData::Comment { contents } => NodeKind::Comment(contents.to_string()),
                NodeData::Element { name, attrs, .. } => NodeKind::Element {
                    tag: name.local.to_string(),
                    attrs: attrs
                        .borrow()
                        .iter()
                        .map(|a| (a.name.local.to_string(), a.value.to_string()))
                        .collect(),
                },
                NodeData::Document
                | NodeData::Doctype { .. }
                | NodeData::ProcessingInstruction { .. } => continue,
            };

            // Adjacent text nodes are merged the way the DOM would expose them.
            if let NodeKind::Text(t) = &kind {
                if let Some(&last) = self.nodes[parent.0].children.last() {
                    if let NodeKind::Text(prev) = &mut self.nodes[last.0].kind {
                        prev.push_str(t);
                        continue;
                    }
                }
            }

            let id = self.append_child(parent, kind);
            for c in h.children.borrow().iter().rev() {
                stack.push((c.clone(), id));
            }
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn tag(&self, id: NodeId) -> Option<String> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag.to_ascii_lowercase()),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let at = self.nodes[parent.0].children.len();
        self.insert_child(parent, at, kind)
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &c in self.children(id) {
            self.serialize_node(&mut out, c, false);
        }
        out
    }

    fn serialize_node(&self, out: &mut String, id: NodeId, raw_text: bool) {
        match &self.nodes[id.0].kind {
            NodeKind::Root => {
                for &c in self.children(id) {
                    self.serialize_node(out, c, raw_text);
                }
            }
            NodeKind::Text(t) => {
                if raw_text {
                    out.push_str(t);
                } else {
                    out.push_str(&esc_text(t));
                }
            }
            NodeKind::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&esc_attr(v));
                    out.push('"');
                }
                if is_void(tag) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                if drops_leading_newline(tag) {
                    if let Some(&first) = self.children(id).first() {
                        if let NodeKind::Text(t) = &self.nodes[first.0].kind {
                            if t.starts_with('\n') {
                                out.push('\n');
                            }
                        }
                    }
                }
                let raw = is_raw_text(tag);
                for &c in self.children(id) {
                    self.serialize_node(out, c, raw);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}
