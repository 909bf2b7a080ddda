//! Category service

use std::sync::Arc;
use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{Category, CategoryInput},
    repositories::CategoryRepository,
    validation::validate_category,
};

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Category not found with id: {}", id))
}

fn name_taken(name: &str) -> ServiceError {
    ServiceError::DuplicateKey(format!("A category named '{}' already exists", name))
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Create a category; names are unique across the system
    pub async fn create(&self, input: CategoryInput) -> ServiceResult<Category> {
        validate_category(&input).map_err(ServiceError::InvalidFormat)?;

        if self.categories.exists_by_name(&input.name).await? {
            return Err(name_taken(&input.name));
        }

        let category = self.categories.insert(&input).await?;
        info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Absence is not an error here; callers decide how to report it
    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Category>> {
        Ok(self.categories.find_by_id(id).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Option<Category>> {
        Ok(self.categories.find_by_name(name).await?)
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.find_all().await?)
    }

    /// Rename a category. Its todos stay attached.
    pub async fn update(&self, id: i64, input: CategoryInput) -> ServiceResult<Category> {
        validate_category(&input).map_err(ServiceError::InvalidFormat)?;

        let mut existing = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if existing.name != input.name {
            if let Some(owner) = self.categories.find_by_name(&input.name).await? {
                if owner.id != id {
                    return Err(name_taken(&input.name));
                }
            }
        }

        existing.name = input.name;

        let category = self.categories.update(&existing).await?;
        info!("Renamed category {} to {}", id, category.name);
        Ok(category)
    }

    /// Delete a category together with every todo filed under it
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.categories.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted category {} and its todos", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Status, ToDoDraft, UserInput},
        repositories::{MemoryStore, ToDoRepository, UserRepository},
    };
    use chrono::NaiveDate;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStore::new()))
    }

    fn named(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn created_category_is_retrievable_by_name() -> ServiceResult<()> {
        let service = service();

        let created = service.create(named("Work")).await?;

        assert_eq!(service.find_by_name("Work").await?, Some(created.clone()));
        assert_eq!(service.find_by_id(created.id).await?, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() -> ServiceResult<()> {
        let service = service();
        service.create(named("Work")).await?;

        let result = service.create(named("Work")).await;

        assert!(matches!(result, Err(ServiceError::DuplicateKey(_))));
        assert_eq!(service.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_invalid() {
        let result = service().create(named("  ")).await;
        assert!(matches!(result, Err(ServiceError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn lookups_of_missing_category_are_empty() -> ServiceResult<()> {
        let service = service();
        assert_eq!(service.find_by_id(1).await?, None);
        assert_eq!(service.find_by_name("Nope").await?, None);
        assert!(service.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_the_name() -> ServiceResult<()> {
        let service = service();
        let created = service.create(named("Work")).await?;

        let renamed = service.update(created.id, named("Office")).await?;

        assert_eq!(renamed.id, created.id);
        assert_eq!(renamed.name, "Office");
        assert_eq!(service.find_by_name("Work").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn rename_keeps_filed_todos_attached() -> ServiceResult<()> {
        let store = MemoryStore::new();
        let service = CategoryService::new(Arc::new(store.clone()));
        let work = service.create(named("Work")).await?;
        let user = UserRepository::insert(
            &store,
            &UserInput {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "password123".to_string(),
            },
        )
        .await?;
        let todo = ToDoRepository::insert(
            &store,
            &ToDoDraft {
                title: "Send report".to_string(),
                description: None,
                status: Status::Pending,
                due_date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
                user_id: user.id,
                category_id: Some(work.id),
            },
        )
        .await?;

        service.update(work.id, named("Office")).await?;

        let kept = ToDoRepository::find_by_id(&store, todo.id).await?;
        assert_eq!(kept, Some(todo.clone()));
        assert_eq!(store.find_by_category_id(work.id).await?, vec![todo]);
        Ok(())
    }

    #[tokio::test]
    async fn update_to_another_categorys_name_is_rejected() -> ServiceResult<()> {
        let service = service();
        let work = service.create(named("Work")).await?;
        service.create(named("Home")).await?;

        let result = service.update(work.id, named("Home")).await;

        assert!(matches!(result, Err(ServiceError::DuplicateKey(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_missing_category_are_not_found() {
        let service = service();

        assert!(matches!(
            service.update(3, named("Work")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(3).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
