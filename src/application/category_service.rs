use std::sync::Arc;

use uuid::Uuid;

use crate::domain::category::{CategoryPatch, CategoryTree, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::CategoryRepository;

pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub fn create_category(&self, input: NewCategory) -> Result<CategoryTree, DomainError> {
        let id = self.repo.create(input)?;
        log::debug!("created category {}", id);
        self.get_category(id)
    }

    pub fn get_category(&self, id: Uuid) -> Result<CategoryTree, DomainError> {
        self.repo.find_tree(id)?.ok_or(DomainError::NotFound("category"))
    }

    pub fn list_categories(
        &self,
        page: PageRequest,
    ) -> Result<ListResult<CategoryTree>, DomainError> {
        self.repo.list(page)
    }

    pub fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<CategoryTree, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        patch.check_parent(id)?;
        if self.repo.update(id, &patch)? == 0 {
            return Err(DomainError::UpdateNoop);
        }
        log::debug!("updated category {}", id);
        self.get_category(id)
    }

    pub fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        log::debug!("deleted category {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::CategoryService;
    use crate::domain::category::{CategoryPatch, NewCategory};
    use crate::domain::errors::DomainError;
    use crate::testing::InMemoryStore;

    fn new_category(name: &str, parent_id: Option<Uuid>) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            parent_id,
        }
    }

    #[test]
    fn root_with_two_children_forms_a_tree() {
        let svc = CategoryService::new(Arc::new(InMemoryStore::default()));

        let a = svc.create_category(new_category("A", None)).expect("create A");
        let b = svc.create_category(new_category("B", Some(a.id))).expect("create B");
        let c = svc.create_category(new_category("C", Some(a.id))).expect("create C");

        let tree = svc.get_category(a.id).expect("get failed");
        let ids: Vec<Uuid> = tree.children.iter().map(|ch| ch.id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
        assert_eq!(b.sibling_count, 1);
        assert_eq!(c.sibling_count, 2);
    }

    #[test]
    fn unknown_parent_is_a_storage_error() {
        let svc = CategoryService::new(Arc::new(InMemoryStore::default()));
        assert!(matches!(
            svc.create_category(new_category("orphan", Some(Uuid::new_v4()))),
            Err(DomainError::Storage(_))
        ));
    }

    #[test]
    fn category_cannot_become_its_own_parent() {
        let svc = CategoryService::new(Arc::new(InMemoryStore::default()));
        let a = svc.create_category(new_category("A", None)).expect("create A");

        let patch = CategoryPatch {
            name: None,
            parent_id: Some(Some(a.id)),
        };
        assert!(matches!(
            svc.update_category(a.id, patch),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn detaching_makes_a_root() {
        let svc = CategoryService::new(Arc::new(InMemoryStore::default()));
        let a = svc.create_category(new_category("A", None)).expect("create A");
        let b = svc.create_category(new_category("B", Some(a.id))).expect("create B");

        let patch = CategoryPatch {
            name: Some("B2".to_string()),
            parent_id: Some(None),
        };
        let updated = svc.update_category(b.id, patch).expect("update failed");

        assert_eq!(updated.parent_id, None);
        assert_eq!(updated.name, "B2");
        assert!(svc.get_category(a.id).expect("get A").children.is_empty());
    }

    #[test]
    fn deleted_category_is_not_found_and_cannot_be_updated() {
        let svc = CategoryService::new(Arc::new(InMemoryStore::default()));
        let a = svc.create_category(new_category("A", None)).expect("create A");

        svc.delete_category(a.id).expect("delete failed");
        svc.delete_category(a.id).expect("repeated delete failed");

        assert!(matches!(
            svc.get_category(a.id),
            Err(DomainError::NotFound("category"))
        ));
        let patch = CategoryPatch {
            name: Some("again".to_string()),
            parent_id: None,
        };
        assert!(matches!(
            svc.update_category(a.id, patch),
            Err(DomainError::UpdateNoop)
        ));
    }
}
