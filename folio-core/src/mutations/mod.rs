//! Mutation resolvers sitting between the GraphQL layer and the entity store.

mod article;
mod entity;
mod file_upload;

pub use article::{ArticleFieldExtractor, ArticleInput, ArticleMutations, ARTICLE_BUNDLE};
pub use entity::{EntityMutationResolver, FieldExtractor};
pub use file_upload::FileUploadResolver;
