use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{ArticleInput, EntityCrudOutput};

#[derive(Default)]
pub struct ArticleMutation;

#[Object]
impl ArticleMutation {
    /// Create a new article
    async fn create_article(
        &self,
        ctx: &Context<'_>,
        input: ArticleInput,
    ) -> Result<EntityCrudOutput> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);
        let outcome = context
            .articles
            .create(&actor, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(EntityCrudOutput::from(outcome))
    }

    /// Update the supplied fields of an existing article
    async fn update_article(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: ArticleInput,
    ) -> Result<EntityCrudOutput> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);
        let outcome = context
            .articles
            .update(&actor, &id, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(EntityCrudOutput::from(outcome))
    }

    /// Delete an article, returning its last state
    async fn delete_article(&self, ctx: &Context<'_>, id: String) -> Result<EntityCrudOutput> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);
        let outcome = context
            .articles
            .delete(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(EntityCrudOutput::from(outcome))
    }
}
