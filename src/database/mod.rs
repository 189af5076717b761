pub mod manager;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;

pub use manager::{Database, DatabaseError};
pub use pagination::{Page, PageQuery, Pagination};
pub use repository::{AdminRepository, ArticleRepository, ContactRepository, RegistrationRepository};
