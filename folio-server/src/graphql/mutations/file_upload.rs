use async_graphql::*;
use tracing::debug;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::{core_error_to_graphql_error, StructuredError};
use crate::graphql::types::EntityCrudOutput;

#[derive(Default)]
pub struct FileUploadMutation;

#[Object]
impl FileUploadMutation {
    /// Store a multipart upload as a temporary file entity
    async fn file_upload(&self, ctx: &Context<'_>, file: Upload) -> Result<EntityCrudOutput> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);

        let value = file
            .value(ctx)
            .map_err(|e| StructuredError::bad_request(format!("Invalid upload: {}", e)))?;
        debug!(
            "Receiving upload {} ({:?})",
            value.filename, value.content_type
        );

        let reader = tokio::fs::File::from_std(value.content);
        let request = context
            .file_system
            .receive_upload(&value.filename, reader)
            .await
            .map_err(|e| StructuredError::internal(format!("Failed to stage upload: {}", e)))?;

        let outcome = context
            .uploads
            .upload(&actor, request)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(EntityCrudOutput::from(outcome))
    }
}
