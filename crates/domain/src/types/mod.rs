//! Domain DTOs exchanged with the Surveys API
//!
//! All types serialize as camelCase JSON. Server-assigned identifiers are
//! optional and left off the wire until the backend fills them in.

pub mod contributor;
pub mod question;
pub mod survey;

pub use contributor::{Contributor, ContributorRequest, Contributors};
pub use question::{Question, QuestionType};
pub use survey::{Survey, TenantSurveys, UserSurveys};
