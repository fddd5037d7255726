//! Golden reference catalog
//!
//! `golden/list` names reference runs, one per line. Each name maps by
//! convention to `golden/<name>.log` and `golden/<name>.vcd`; those files are
//! only checked when accessed.

use crate::error::GoldenError;
use crate::project::ProjectDir;
use serde::Serialize;

/// Selectable golden items with the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoldenCatalog {
    items: Vec<String>,
    selected: Option<usize>,
}

impl GoldenCatalog {
    /// Build from manifest text: non-empty trimmed lines, duplicates kept
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let items: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    /// Read the project's manifest; a missing manifest gives an empty catalog
    ///
    /// # Errors
    /// The manifest exists but cannot be read
    pub fn load(project: &ProjectDir) -> Result<Self, GoldenError> {
        let path = project.golden_manifest();
        if !path.is_file() {
            tracing::debug!("No golden manifest at {}", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| GoldenError::io_error(&path, e))?;
        Ok(Self::parse(&text))
    }

    /// Items in manifest order
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// No items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected index
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selected item
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.items[i].as_str())
    }

    /// Selected item, or [`GoldenError::NoSelection`]
    ///
    /// # Errors
    /// Nothing selected
    pub fn require_selected(&self) -> Result<&str, GoldenError> {
        self.selected().ok_or(GoldenError::NoSelection)
    }

    /// Select the first item with this name
    ///
    /// # Errors
    /// [`GoldenError::UnknownItem`] when the name is not listed
    pub fn select(&mut self, name: &str) -> Result<(), GoldenError> {
        let name = name.trim();
        let index = self
            .items
            .iter()
            .position(|item| item == name)
            .ok_or_else(|| GoldenError::UnknownItem(name.to_string()))?;
        self.selected = Some(index);
        Ok(())
    }

    /// Select by position
    ///
    /// # Errors
    /// [`GoldenError::NoSelection`] when out of range
    pub fn select_index(&mut self, index: usize) -> Result<(), GoldenError> {
        if index >= self.items.len() {
            return Err(GoldenError::NoSelection);
        }
        self.selected = Some(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_skips_blank_lines_and_keeps_duplicates() {
        let catalog = GoldenCatalog::parse("t1\n\n t2 \nt1\n");
        assert_eq!(catalog.items(), ["t1", "t2", "t1"]);
        assert_eq!(catalog.selected(), Some("t1"));
        assert_eq!(catalog.selected_index(), Some(0));
    }

    #[test]
    fn empty_manifest_has_no_selection() {
        let catalog = GoldenCatalog::parse("\n   \n");
        assert!(catalog.is_empty());
        assert!(matches!(catalog.require_selected(), Err(GoldenError::NoSelection)));
    }

    #[test]
    fn select_by_name_and_index() {
        let mut catalog = GoldenCatalog::parse("reset\nalu_add\nalu_sub\n");
        catalog.select(" alu_sub").unwrap();
        assert_eq!(catalog.selected(), Some("alu_sub"));

        catalog.select_index(1).unwrap();
        assert_eq!(catalog.selected(), Some("alu_add"));

        assert!(matches!(catalog.select("mul"), Err(GoldenError::UnknownItem(n)) if n == "mul"));
        assert!(catalog.select_index(3).is_err());
        assert_eq!(catalog.selected(), Some("alu_add"));
    }

    #[test]
    fn crlf_manifest() {
        let catalog = GoldenCatalog::parse("a\r\nb\r\n");
        assert_eq!(catalog.items(), ["a", "b"]);
    }

    #[test]
    fn load_without_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = GoldenCatalog::load(&ProjectDir::new(dir.path())).unwrap();
        assert_eq!(catalog, GoldenCatalog::default());
    }
}
