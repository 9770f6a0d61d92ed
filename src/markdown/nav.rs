use serde::Serialize;

/// A second-level heading listed under its section in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub text: String,
}

/// A top-level heading and the second-level headings that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub id: String,
    pub text: String,
    pub children: Vec<NavEntry>,
}

/// The sidebar's table of contents, in document order.
///
/// Sections are keyed by identifier but kept as a list: two top-level
/// headings with the same text both get an entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavigationTree {
    sections: Vec<NavSection>,
}

impl NavigationTree {
    /// Start a new section. Later children attach to it until the next call.
    pub fn open_section(&mut self, id: &str, text: &str) {
        if self.get(id).is_some() {
            log::warn!("duplicate heading identifier `{id}`");
        }
        self.sections.push(NavSection {
            id: id.to_string(),
            text: text.to_string(),
            children: vec![],
        });
    }

    /// Attach a child to the most recently opened section. Returns false,
    /// recording nothing, if no section has been opened yet.
    pub fn add_child(&mut self, id: &str, text: &str) -> bool {
        match self.sections.last_mut() {
            Some(section) => {
                section.children.push(NavEntry {
                    id: id.to_string(),
                    text: text.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// Look up a section by identifier. With duplicates, the first wins.
    pub fn get(&self, id: &str) -> Option<&NavSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of second-level entries across all sections.
    pub fn child_count(&self) -> usize {
        self.sections.iter().map(|s| s.children.len()).sum()
    }
}
