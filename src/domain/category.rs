use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// `None` marks a root category.
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Fields to change on an existing category.
///
/// `parent_id` is doubly optional: `Some(None)` detaches the category and
/// turns it into a root, `None` leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }

    /// Rejects patches that would make category `id` its own parent.
    pub fn check_parent(&self, id: Uuid) -> Result<(), DomainError> {
        if self.parent_id == Some(Some(id)) {
            return Err(DomainError::InvalidInput(
                "a category cannot be its own parent".to_string(),
            ));
        }
        Ok(())
    }
}

/// A direct child of a [`CategoryTree`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChild {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Name of one live product filed under this child, if any.
    pub product_name: Option<String>,
}

/// Denormalized read model for a category: the node itself, one product
/// name, how many categories share its parent, and its direct children.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub product_name: Option<String>,
    /// Live categories under the same parent, this node included.
    pub sibling_count: i64,
    pub children: Vec<CategoryChild>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryTree {
    /// Builds a tree node from the flat rows fetched for it.
    ///
    /// `children` must already be in the order they should be presented
    /// (insertion order). Rows whose `parent_id` is not `node.id` are
    /// skipped, so callers may pass a batch loaded for several nodes.
    pub fn assemble(
        node: Category,
        product_name: Option<String>,
        sibling_count: i64,
        children: &[Category],
        product_names: &HashMap<Uuid, String>,
    ) -> Self {
        let children = children
            .iter()
            .filter(|c| c.parent_id == Some(node.id))
            .map(|c| CategoryChild {
                id: c.id,
                name: c.name.clone(),
                parent_id: c.parent_id,
                product_name: product_names.get(&c.id).cloned(),
            })
            .collect();

        Self {
            id: node.id,
            name: node.name,
            parent_id: node.parent_id,
            product_name,
            sibling_count,
            children,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn children_keep_their_given_order() {
        let root = category("A", None);
        let b = category("B", Some(root.id));
        let c = category("C", Some(root.id));

        let tree = CategoryTree::assemble(
            root.clone(),
            None,
            1,
            &[b.clone(), c.clone()],
            &HashMap::new(),
        );

        let ids: Vec<Uuid> = tree.children.iter().map(|ch| ch.id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
        assert_eq!(tree.id, root.id);
        assert_eq!(tree.parent_id, None);
        assert_eq!(tree.sibling_count, 1);
    }

    #[test]
    fn rows_of_other_parents_are_skipped() {
        let root = category("A", None);
        let other = category("X", None);
        let b = category("B", Some(root.id));
        let stray = category("Y", Some(other.id));

        let tree = CategoryTree::assemble(root, None, 2, &[stray, b.clone()], &HashMap::new());

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].id, b.id);
    }

    #[test]
    fn product_names_are_attached_per_child() {
        let root = category("Stationery", None);
        let pens = category("Pens", Some(root.id));
        let paper = category("Paper", Some(root.id));
        let names = HashMap::from([(pens.id, "Fountain pen".to_string())]);

        let tree = CategoryTree::assemble(
            root,
            Some("Notebook".to_string()),
            1,
            &[pens, paper],
            &names,
        );

        assert_eq!(tree.product_name.as_deref(), Some("Notebook"));
        assert_eq!(tree.children[0].product_name.as_deref(), Some("Fountain pen"));
        assert_eq!(tree.children[1].product_name, None);
    }

    #[test]
    fn leaf_has_no_children() {
        let root = category("A", None);
        let leaf = category("B", Some(root.id));

        let tree = CategoryTree::assemble(leaf, None, 1, &[], &HashMap::new());

        assert!(tree.children.is_empty());
        assert_eq!(tree.parent_id, Some(root.id));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(CategoryPatch::default().is_empty());
        let detach = CategoryPatch {
            name: None,
            parent_id: Some(None),
        };
        assert!(!detach.is_empty());
    }

    #[test]
    fn self_parenting_is_rejected() {
        let id = Uuid::new_v4();
        let patch = CategoryPatch {
            name: None,
            parent_id: Some(Some(id)),
        };
        assert!(matches!(
            patch.check_parent(id),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(patch.check_parent(Uuid::new_v4()).is_ok());
    }
}
