mod article;
mod file_upload;

use async_graphql::*;

/// Mutation root combining the article and upload mutations
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub article::ArticleMutation,
    pub file_upload::FileUploadMutation,
);
