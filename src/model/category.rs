//! Label categories and their palette colors.

use crate::constants::LABEL_PALETTE;

/// A label category with a name and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier for the category
    pub id: u32,
    /// Display name of the category
    pub name: String,
    /// RGB color for the category
    pub color: [u8; 3],
}

impl Category {
    /// Create a new category with the given ID, name, and color.
    pub fn new(id: u32, name: &str, color: [u8; 3]) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
        }
    }
}

/// Built-in reflux study categories, in button order.
pub const DEFAULT_CATEGORY_NAMES: [&str; 5] =
    ["Reflux", "Mixed Reflux", "Erutation", "Swallow", "Meal"];

/// Default categories for a new session.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Category::new(i as u32 + 1, name, LABEL_PALETTE[i]))
        .collect()
}

/// Keeps the one-color-per-category mapping.
///
/// A category gets its color the first time it is used; colors come from
/// [`LABEL_PALETTE`] in creation order and wrap when the palette runs out.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Empty registry (no categories known yet).
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Registry seeded with the given categories, in order.
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// All known categories in creation order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Color of a known category.
    pub fn color_of(&self, name: &str) -> Option<[u8; 3]> {
        self.get(name).map(|c| c.color)
    }

    /// Return the category, registering it with the next palette color if new.
    pub fn resolve(&mut self, name: &str) -> &Category {
        if let Some(idx) = self.categories.iter().position(|c| c.name == name) {
            return &self.categories[idx];
        }

        let color = LABEL_PALETTE[self.categories.len() % LABEL_PALETTE.len()];
        self.insert(name, color)
    }

    /// Register a category with an explicit color, unless it already exists.
    ///
    /// Used when labels are loaded from a file: the stored color wins for
    /// categories seen for the first time. The returned category carries the
    /// color callers must use from now on.
    pub fn adopt(&mut self, name: &str, color: [u8; 3]) -> &Category {
        if let Some(idx) = self.categories.iter().position(|c| c.name == name) {
            if self.categories[idx].color != color {
                log::warn!(
                    "Category '{}' already uses color {:?}, ignoring {:?}",
                    name,
                    self.categories[idx].color,
                    color
                );
            }
            return &self.categories[idx];
        }
        self.insert(name, color)
    }

    fn insert(&mut self, name: &str, color: [u8; 3]) -> &Category {
        let id = self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        log::debug!("Registered category '{}' (id {}, color {:?})", name, id, color);
        self.categories.push(Category::new(id, name, color));
        &self.categories[self.categories.len() - 1]
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_categories(default_categories())
    }
}
