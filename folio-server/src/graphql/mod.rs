pub mod context;
pub mod errors;
pub mod mutations;
pub mod queries;
pub mod types;

use async_graphql::{EmptySubscription, Schema};

pub use context::GraphQLContext;

pub type FolioSchema = Schema<queries::Query, mutations::Mutation, EmptySubscription>;

pub fn build_schema(context: GraphQLContext) -> FolioSchema {
    Schema::build(
        queries::Query,
        mutations::Mutation::default(),
        EmptySubscription,
    )
    .data(context)
    .finish()
}
