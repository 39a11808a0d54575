//! qa-page - Question detail page for a Q&A site
//!
//! This library loads a question with its tags and answers from the question
//! API, renders it, and posts new answers on behalf of the signed-in user.

pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod services;
pub mod theme;
