/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login, refresh)
/// - `projects`: Project CRUD and listing
/// - `members`: Collaborator management under a project
/// - `issues`: Issue CRUD nested under a project
/// - `comments`: Comment CRUD nested under an issue

pub mod auth;
pub mod comments;
pub mod health;
pub mod issues;
pub mod members;
pub mod projects;
