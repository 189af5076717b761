pub mod admin;
pub mod article;
pub mod contact;
pub mod registration;

pub use admin::{Admin, NewAdmin};
pub use article::{Article, ArticleStatus, NewArticle};
pub use contact::{Contact, NewContact};
pub use registration::{NewRegistration, Registration};
