use async_graphql::*;
use tracing::debug;

use folio::auth::Operation;
use folio::content::{FileEntity, Node};
use folio::store::{parse_id, EntityStore};

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{FileObject, NodeArticle};

pub struct Query;

#[Object]
impl Query {
    /// Get an article by ID
    async fn article(&self, ctx: &Context<'_>, id: String) -> Result<Option<NodeArticle>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };

        let node = EntityStore::<Node>::load(context.store.as_ref(), id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(node
            .filter(|node| node.bundle == context.articles.bundle())
            .filter(|node| {
                let allowed = context.store.check_access(node, Operation::View, &actor);
                if !allowed {
                    debug!("View of node {} hidden from user {:?}", id, actor.user_id);
                }
                allowed
            })
            .map(NodeArticle::from))
    }

    /// Get a file by ID
    async fn file(&self, ctx: &Context<'_>, id: String) -> Result<Option<FileObject>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx);
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };

        let file = EntityStore::<FileEntity>::load(context.store.as_ref(), id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(file
            .filter(|file| context.store.check_access(file, Operation::View, &actor))
            .map(FileObject::from))
    }
}
