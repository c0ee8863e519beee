pub mod article;
pub mod research;
pub mod source;

pub use article::{Article, ArticleDraft, Citation};
pub use research::{ResearchBundle, ResearchEntry};
pub use source::{ExtractedContent, ExtractionFailure, SourceCandidate};
