use std::sync::Arc;

use folio::auth::{AccessPolicy, Actor, PermissionAccessPolicy};
use folio::files::{ExtensionMimeTypeGuesser, LocalFileSystem};
use folio::mutations::{ArticleFieldExtractor, ArticleMutations, FileUploadResolver, ARTICLE_BUNDLE};
use folio::store::SeaOrmEntityStore;
use folio::FolioConfig;
use sea_orm::DatabaseConnection;

/// Collaborators shared by every GraphQL request.
#[derive(Clone)]
pub struct GraphQLContext {
    pub config: Arc<FolioConfig>,
    pub store: Arc<SeaOrmEntityStore>,
    pub file_system: Arc<LocalFileSystem>,
    pub articles: Arc<ArticleMutations>,
    pub uploads: Arc<FileUploadResolver>,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection, config: FolioConfig) -> Self {
        Self::with_access_policy(db, config, Arc::new(PermissionAccessPolicy))
    }

    pub fn with_access_policy(
        db: DatabaseConnection,
        config: FolioConfig,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        let store = Arc::new(
            SeaOrmEntityStore::new(db, access)
                .with_default_body_format(config.default_body_format.clone()),
        );
        let file_system = Arc::new(LocalFileSystem::new(&config));

        let articles = Arc::new(ArticleMutations::new(
            store.clone(),
            ArticleFieldExtractor,
            ARTICLE_BUNDLE,
        ));
        let uploads = Arc::new(FileUploadResolver::new(
            store.clone(),
            file_system.clone(),
            Arc::new(ExtensionMimeTypeGuesser),
            config.max_upload_size,
            config.max_filename_length,
        ));

        Self {
            config: Arc::new(config),
            store,
            file_system,
            articles,
            uploads,
        }
    }

    /// The caller attached to the request, or the configured anonymous actor.
    pub fn actor_for_request(&self, ctx: &async_graphql::Context<'_>) -> Actor {
        ctx.data_opt::<Actor>()
            .cloned()
            .unwrap_or_else(|| self.config.anonymous_actor())
    }
}
