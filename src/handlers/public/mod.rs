// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Site content for visitors, the admission and contact forms, and token
// acquisition for administrators.
//
// Security Level: None
// Middleware: request logging only
pub mod articles;
pub mod auth;
pub mod contacts;
pub mod registrations;
pub mod system;
