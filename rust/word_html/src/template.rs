use crate::document::assemble;
use crate::error::{Error, Result};
use crate::normalize::Normalizer;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_name: String,
    pub sort_order: u32,
    #[serde(default)]
    pub content: String,
}

impl Section {
    pub fn new(section_name: impl Into<String>, sort_order: u32, content: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            sort_order,
            content: content.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.section_name.trim().is_empty() && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "templateName")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(alias = "subType", default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope { data: Template },
    Bare(Template),
}

impl Template {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            subtype: None,
            sections: vec![Section::new("", 1, "")],
        }
    }

    // Bare template or the store's `{ "data": ... }` envelope.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(json)?;
        Ok(match payload {
            Payload::Envelope { data } => data,
            Payload::Bare(t) => t,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_section(&mut self) -> &mut Section {
        let next = self
            .sections
            .iter()
            .map(|s| s.sort_order)
            .max()
            .map_or(1, |m| m.saturating_add(1));
        self.sections.push(Section::new("", next, ""));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        if self.sections.len() <= 1 || index >= self.sections.len() {
            return None;
        }
        let removed = self.sections.remove(index);
        self.resequence();
        Some(removed)
    }

    pub fn move_section_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.sections.len() {
            return false;
        }
        self.sections.swap(index - 1, index);
        self.resequence();
        true
    }

    pub fn move_section_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.sections.len() {
            return false;
        }
        self.sections.swap(index, index + 1);
        self.resequence();
        true
    }

    fn resequence(&mut self) {
        for (i, s) in self.sections.iter_mut().enumerate() {
            s.sort_order = i as u32 + 1;
        }
    }

    pub fn valid_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_valid())
    }

    pub fn sorted_sections(&self) -> Vec<&Section> {
        let mut out: Vec<&Section> = self.sections.iter().collect();
        out.sort_by_key(|s| s.sort_order);
        out
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Template("template name is required".into()));
        }
        if self.valid_sections().next().is_none() {
            return Err(Error::Template(
                "at least one section with name and content is required".into(),
            ));
        }
        Ok(())
    }

    pub fn normalize_sections(&mut self, profile: Profile) {
        let normalizer = Normalizer::new(profile);
        for s in &mut self.sections {
            s.content = normalizer.sanitize_fragment(&s.content);
        }
    }

    pub fn render_document(&self, profile: Profile) -> String {
        let normalizer = Normalizer::new(profile);
        let mut body = String::new();
        for s in self.sorted_sections() {
            if !s.is_valid() {
                continue;
            }
            body.push_str(&normalizer.sanitize_fragment(&s.content));
        }
        log::debug!(
            "rendered template {:?} ({} section(s)) with {profile} profile",
            self.name,
            self.valid_sections().count()
        );
        assemble(&body, profile.config())
    }
}
