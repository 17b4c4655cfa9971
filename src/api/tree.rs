// Category tree helpers.
// Navigation over the typed category hierarchy returned by `get_categories`.

use super::types::{CategoriesResult, Category};

impl CategoriesResult<Category> {
    /// Skip a lone top-level category and return its children instead.
    ///
    /// Portals often wrap the whole taxonomy in one root node; the guide count is kept.
    pub fn bypass_single_top_node(self) -> Self {
        if self.children.len() != 1 {
            return self;
        }

        let guides_count = self.guides_count;
        let children = self
            .children
            .into_iter()
            .next()
            .map(|root| root.children)
            .unwrap_or_default();

        Self {
            guides_count,
            children,
        }
    }
}

/// Find the top-level category that is, or contains, the category with `id`.
pub fn find_top_ancestor(categories: &[Category], id: u64) -> Option<&Category> {
    categories
        .iter()
        .find(|category| category.id == id || find_top_ancestor(&category.children, id).is_some())
}

/// Find a category whose name contains `segment`, ignoring case.
///
/// Each level is searched before descending into the children.
pub fn find_category_by_name<'a>(categories: &'a [Category], segment: &str) -> Option<&'a Category> {
    if segment.is_empty() {
        return None;
    }

    let needle = segment.to_lowercase();
    categories
        .iter()
        .find(|category| category.name.to_lowercase().contains(&needle))
        .or_else(|| {
            categories
                .iter()
                .find_map(|category| find_category_by_name(&category.children, segment))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str, children: Vec<Category>) -> Category {
        Category {
            id,
            name: name.to_string(),
            children,
            ..Default::default()
        }
    }

    fn taxonomy() -> Vec<Category> {
        vec![
            category(
                1,
                "Accounts",
                vec![
                    category(2, "Passwords", vec![category(3, "Two-factor login", vec![])]),
                    category(4, "Profile", vec![]),
                ],
            ),
            category(5, "Billing", vec![category(6, "Invoices", vec![])]),
        ]
    }

    #[test]
    fn test_bypass_single_top_node() {
        let wrapped = CategoriesResult {
            guides_count: 12,
            children: vec![category(100, "Root", taxonomy())],
        };

        let bypassed = wrapped.bypass_single_top_node();
        assert_eq!(bypassed.guides_count, 12);
        let ids: Vec<u64> = bypassed.children.iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 5]);
    }

    #[test]
    fn test_bypass_keeps_multiple_top_nodes() {
        let result = CategoriesResult {
            guides_count: 3,
            children: taxonomy(),
        };
        let unchanged = result.bypass_single_top_node();
        assert_eq!(unchanged.children.len(), 2);
    }

    #[test]
    fn test_find_top_ancestor() {
        let categories = taxonomy();
        assert_eq!(find_top_ancestor(&categories, 3).map(|c| c.id), Some(1));
        assert_eq!(find_top_ancestor(&categories, 5).map(|c| c.id), Some(5));
        assert_eq!(find_top_ancestor(&categories, 6).map(|c| c.id), Some(5));
        assert!(find_top_ancestor(&categories, 42).is_none());
    }

    #[test]
    fn test_find_category_by_name() {
        let categories = taxonomy();
        assert_eq!(find_category_by_name(&categories, "bill").map(|c| c.id), Some(5));
        assert_eq!(find_category_by_name(&categories, "LOGIN").map(|c| c.id), Some(3));
        assert_eq!(find_category_by_name(&categories, "invoice").map(|c| c.id), Some(6));
        assert!(find_category_by_name(&categories, "shipping").is_none());
        assert!(find_category_by_name(&categories, "").is_none());
    }

    #[test]
    fn test_find_category_prefers_shallow_match() {
        let categories = vec![
            category(1, "Help", vec![category(2, "Password help", vec![])]),
            category(3, "Password", vec![]),
        ];
        assert_eq!(find_category_by_name(&categories, "password").map(|c| c.id), Some(3));
    }
}
