pub mod domain;
pub mod listing;
pub mod ports;
pub mod query;

pub use domain::{
    AuthorSummary, Interaction, InteractionAction, Question, QuestionSummary, Tag, TagRef,
    TagSummary, TargetKind, User,
};
pub use listing::{ListError, ListingEngine, Page};
pub use ports::{ContentStore, PortError, PortResult};
pub use query::{
    PageWindow, QuestionCriteria, QuestionFilter, QuestionQuery, QuestionSort, TagCriteria,
    TagQuery, ValidationError, DEFAULT_PAGE_SIZE,
};
