pub mod article;
pub mod file;
pub mod outcome;

pub use article::{ArticleInput, NodeArticle, TextField};
pub use file::{FileObject, FileStatus};
pub use outcome::{ConstraintViolation, Entity, EntityCrudOutput};
