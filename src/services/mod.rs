//! Services layer - Page logic
//!
//! This module contains the logic behind the question page:
//! - The question view state and its load/submit cycle
//! - Relative timestamp phrasing
//! - The session capability the view reads the current user from

pub mod question_view;
pub mod relative_time;
pub mod session;

pub use question_view::{QuestionView, SubmitError, ViewState};
pub use relative_time::RelativeTimeFormatter;
pub use session::{SessionProvider, StaticSession};
