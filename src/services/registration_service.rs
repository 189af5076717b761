use std::sync::Arc;

use serde::Deserialize;

use super::{missing, ServiceError};
use crate::database::models::{NewRegistration, Registration};
use crate::database::{DatabaseError, Page, Pagination, RegistrationRepository};
use crate::validation::{FieldErrors, Validator};

/// Public admission form. Dates arrive as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationInput {
    pub student_type: String,
    pub gender: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub place_of_birth: String,
    pub date_of_birth: String,
    pub address: String,
    pub origin_school: String,
    pub nisn: String,
    pub father_name: String,
    pub father_occupation: String,
    pub phone_father: String,
    pub date_of_birth_father: String,
    pub mother_name: String,
    pub mother_occupation: String,
    pub phone_mother: String,
    pub date_of_birth_mother: String,
}

impl RegistrationInput {
    pub fn validate(self) -> Result<NewRegistration, FieldErrors> {
        let mut v = Validator::new();
        v.one_of("student_type", &self.student_type, &["new", "transfer"]);
        v.one_of("gender", &self.gender, &["male", "female"]);
        v.email("email", &self.email);
        v.length("full_name", &self.full_name, 3, 100);
        v.length("phone", &self.phone, 10, 13);
        v.length("place_of_birth", &self.place_of_birth, 3, 100);
        let dob = v.date("date_of_birth", &self.date_of_birth);
        v.length("address", &self.address, 3, 255);
        v.length("origin_school", &self.origin_school, 3, 100);
        v.exact_length("nisn", &self.nisn, 10);
        v.length("father_name", &self.father_name, 3, 100);
        v.length("father_occupation", &self.father_occupation, 3, 100);
        v.length("phone_father", &self.phone_father, 10, 13);
        let dob_father = v.date("date_of_birth_father", &self.date_of_birth_father);
        v.length("mother_name", &self.mother_name, 3, 100);
        v.length("mother_occupation", &self.mother_occupation, 3, 100);
        v.length("phone_mother", &self.phone_mother, 10, 13);
        let dob_mother = v.date("date_of_birth_mother", &self.date_of_birth_mother);

        let (date_of_birth, date_of_birth_father, date_of_birth_mother) =
            match (v.is_valid(), dob, dob_father, dob_mother) {
                (true, Some(a), Some(b), Some(c)) => (a, b, c),
                _ => return Err(v.finish().err().unwrap_or_default()),
            };

        Ok(NewRegistration {
            student_type: self.student_type,
            gender: self.gender,
            email: self.email,
            full_name: self.full_name,
            phone: self.phone,
            place_of_birth: self.place_of_birth,
            date_of_birth,
            address: self.address,
            origin_school: self.origin_school,
            nisn: self.nisn,
            father_name: self.father_name,
            father_occupation: self.father_occupation,
            phone_father: self.phone_father,
            date_of_birth_father,
            mother_name: self.mother_name,
            mother_occupation: self.mother_occupation,
            phone_mother: self.phone_mother,
            date_of_birth_mother,
        })
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    repo: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    pub fn new(repo: Arc<dyn RegistrationRepository>) -> Self {
        Self { repo }
    }

    /// Email is checked before NISN; either being taken is a conflict.
    pub async fn create(&self, input: RegistrationInput) -> Result<Registration, ServiceError> {
        let new = input.validate()?;

        if self.repo.exists_by_email(&new.email).await? {
            tracing::info!("registration rejected: email already used");
            return Err(ServiceError::Conflict("registration email already used".into()));
        }
        if self.repo.exists_by_nisn(&new.nisn).await? {
            tracing::info!("registration rejected: nisn already used");
            return Err(ServiceError::Conflict("registration nisn already used".into()));
        }

        let registration = self.repo.create(new).await.map_err(|e| match e {
            // lost a race with a concurrent submission
            DatabaseError::UniqueViolation(_) => {
                ServiceError::Conflict("registration already submitted".into())
            }
            other => ServiceError::Database(other),
        })?;

        tracing::info!(registration_id = registration.id, "registration submitted");
        Ok(registration)
    }

    pub async fn list(&self, page: Pagination) -> Result<Page<Registration>, ServiceError> {
        Ok(self.repo.list(page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Registration, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("registration"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete(id).await.map_err(missing("registration"))?;
        tracing::info!(registration_id = id, "registration deleted");
        Ok(())
    }
}
