//! REST API tests

mod auth_tests;
mod chat_tests;
mod health_tests;
mod social_tests;
