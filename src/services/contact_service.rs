use std::sync::Arc;

use serde::Deserialize;

use super::{missing, ServiceError};
use crate::database::models::{Contact, NewContact};
use crate::database::{ContactRepository, Page, Pagination};
use crate::validation::{FieldErrors, Validator};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactInput {
    pub fn validate(self) -> Result<NewContact, FieldErrors> {
        let mut v = Validator::new();
        v.email("email", &self.email);
        v.length("subject", &self.subject, 3, 150);
        v.length("message", &self.message, 3, 2000);
        v.finish()?;
        Ok(NewContact {
            email: self.email,
            subject: self.subject,
            message: self.message,
        })
    }
}

#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: ContactInput) -> Result<Contact, ServiceError> {
        let contact = self.repo.create(input.validate()?).await?;
        tracing::info!(contact_id = contact.id, "contact message received");
        Ok(contact)
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Contact>, ServiceError> {
        Ok(self.repo.list(page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Contact, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("contact"))
    }

    pub async fn update(&self, id: i64, input: ContactInput) -> Result<Contact, ServiceError> {
        let contact = self
            .repo
            .update(id, input.validate()?)
            .await
            .map_err(missing("contact"))?;
        tracing::info!(contact_id = id, "contact updated");
        Ok(contact)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(missing("contact"))?;
        tracing::info!(contact_id = id, "contact deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryContactRepository;

    fn input(subject: &str) -> ContactInput {
        ContactInput {
            email: "parent@family.test".into(),
            subject: subject.into(),
            message: "When does enrollment open?".into(),
        }
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let svc = ContactService::new(Arc::new(MemoryContactRepository::default()));
        let created = svc.create(input("Enrollment")).await.unwrap();

        let updated = svc.update(created.id, input("Enrollment dates")).await.unwrap();
        assert_eq!(updated.subject, "Enrollment dates");
        assert_eq!(updated.created_at, created.created_at);

        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound("contact"))));
        assert!(matches!(
            svc.update(created.id, input("Gone")).await,
            Err(ServiceError::NotFound("contact"))
        ));
    }

    #[tokio::test]
    async fn rejects_short_subject_and_bad_email() {
        let svc = ContactService::new(Arc::new(MemoryContactRepository::default()));
        let mut bad = input("Hi");
        bad.email = "parent".into();
        match svc.create(bad).await {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.contains_key("subject"));
                assert!(errors.contains_key("email"));
                assert!(!errors.contains_key("message"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|c| c.id)),
        }
    }
}
