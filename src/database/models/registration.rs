use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admission registration submitted from the public site
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub student_type: String,
    pub gender: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub place_of_birth: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub origin_school: String,
    pub nisn: String,
    pub father_name: String,
    pub father_occupation: String,
    pub phone_father: String,
    pub date_of_birth_father: NaiveDate,
    pub mother_name: String,
    pub mother_occupation: String,
    pub phone_mother: String,
    pub date_of_birth_mother: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub student_type: String,
    pub gender: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub place_of_birth: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub origin_school: String,
    pub nisn: String,
    pub father_name: String,
    pub father_occupation: String,
    pub phone_father: String,
    pub date_of_birth_father: NaiveDate,
    pub mother_name: String,
    pub mother_occupation: String,
    pub phone_mother: String,
    pub date_of_birth_mother: NaiveDate,
}

impl NewRegistration {
    pub fn into_registration(self, id: i64, created_at: DateTime<Utc>) -> Registration {
        Registration {
            id,
            student_type: self.student_type,
            gender: self.gender,
            email: self.email,
            full_name: self.full_name,
            phone: self.phone,
            place_of_birth: self.place_of_birth,
            date_of_birth: self.date_of_birth,
            address: self.address,
            origin_school: self.origin_school,
            nisn: self.nisn,
            father_name: self.father_name,
            father_occupation: self.father_occupation,
            phone_father: self.phone_father,
            date_of_birth_father: self.date_of_birth_father,
            mother_name: self.mother_name,
            mother_occupation: self.mother_occupation,
            phone_mother: self.phone_mother,
            date_of_birth_mother: self.date_of_birth_mother,
            created_at,
        }
    }
}
