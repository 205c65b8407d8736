mod answer;
mod bank;
mod ids;
mod question;
mod result;

pub use answer::{AnswerLog, AnswerRecord};
pub use bank::{BankError, QuestionBank};
pub use ids::{ParseIdError, QuizId};
pub use question::{QuestionError, QuestionItem, QuestionKind};
pub use result::{ResultError, SessionResult};
