//! Data models
//!
//! Read-only view models received from the question API, plus the payload
//! posted when answering.

mod answer;
mod question;
mod tag;
mod user;

pub use answer::{Answer, AnswerWithAuthor, NewAnswer};
pub use question::{Question, QuestionDetail};
pub use tag::Tag;
pub use user::User;
