pub mod import;
pub mod question;
pub use import::{ImportAction, ImportOutcome, ImportRow, ParsedSheet};
pub use question::{Question, QuestionDraft};
