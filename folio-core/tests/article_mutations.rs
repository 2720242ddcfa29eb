//! Article create/update/delete through the generic mutation resolver

use std::sync::Arc;

use folio::auth::{Actor, PermissionAccessPolicy};
use folio::content::Node;
use folio::database::test_utils::setup_test_db;
use folio::mutations::{ArticleFieldExtractor, ArticleInput, ArticleMutations, ARTICLE_BUNDLE};
use folio::store::{EntityStore, SeaOrmEntityStore};

fn author(user_id: i32) -> Actor {
    Actor::user(user_id).with_permissions([
        "access content",
        "create article content",
        "edit own article content",
        "delete own article content",
    ])
}

async fn setup() -> (ArticleMutations, Arc<SeaOrmEntityStore>) {
    let store = Arc::new(
        SeaOrmEntityStore::new(setup_test_db().await, Arc::new(PermissionAccessPolicy))
            .with_default_body_format("basic_html"),
    );
    let resolver = ArticleMutations::new(store.clone(), ArticleFieldExtractor, ARTICLE_BUNDLE);
    (resolver, store)
}

async fn create(resolver: &ArticleMutations, actor: &Actor, title: &str, body: &str) -> Node {
    resolver
        .create(actor, ArticleInput::new(title, body))
        .await
        .unwrap()
        .entity
        .expect("article was created")
}

#[tokio::test]
async fn create_returns_saved_article() {
    let (resolver, store) = setup().await;

    let outcome = resolver
        .create(&author(1), ArticleInput::new("Hey", "Ho"))
        .await
        .unwrap();

    assert!(outcome.violations.is_empty());
    assert!(outcome.errors.is_empty());
    let node = outcome.entity.unwrap();
    assert_eq!(node.title, "Hey");
    assert_eq!(node.body.value, "Ho");
    assert_eq!(node.bundle, "article");
    assert_eq!(node.owner_id, Some(1));

    let stored = EntityStore::<Node>::load(store.as_ref(), node.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, node.title);
    assert_eq!(stored.body, node.body);
    assert_eq!(stored.owner_id, node.owner_id);
}

#[tokio::test]
async fn create_without_permission_writes_nothing() {
    let (resolver, store) = setup().await;
    let reader = Actor::user(2).with_permission("access content");

    let outcome = resolver
        .create(&reader, ArticleInput::new("Hey", "Ho"))
        .await
        .unwrap();

    assert!(outcome.entity.is_none());
    assert_eq!(
        outcome.errors,
        vec!["You do not have the necessary permissions to create entities of this type."]
    );
    assert!(EntityStore::<Node>::load(store.as_ref(), 1)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn create_with_blank_title_reports_violation() {
    let (resolver, store) = setup().await;

    let outcome = resolver
        .create(
            &author(1),
            ArticleInput {
                title: None,
                body: Some("Ho".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(outcome.entity.is_none());
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.violations[0].path, "title");
    assert!(EntityStore::<Node>::load(store.as_ref(), 1)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn update_replaces_supplied_fields() {
    let (resolver, _store) = setup().await;
    let actor = author(1);
    let node = create(&resolver, &actor, "Hey", "Ho").await;
    let id = node.id.unwrap().to_string();

    let outcome = resolver
        .update(&actor, &id, ArticleInput::new("Heyo", "Let's go"))
        .await
        .unwrap();

    assert!(outcome.errors.is_empty() && outcome.violations.is_empty());
    let updated = outcome.entity.unwrap();
    assert_eq!(updated.title, "Heyo");
    assert_eq!(updated.body.value, "Let's go");
    assert_eq!(updated.body.format.as_deref(), Some("basic_html"));
}

#[tokio::test]
async fn title_only_update_keeps_body() {
    let (resolver, store) = setup().await;
    let actor = author(1);
    let node = create(&resolver, &actor, "Hey", "Ho").await;
    let id = node.id.unwrap();

    let outcome = resolver
        .update(
            &actor,
            &id.to_string(),
            ArticleInput {
                title: Some("Heyo".to_string()),
                body: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.entity.unwrap().body.value, "Ho");

    // Empty strings are ignored as well
    resolver
        .update(
            &actor,
            &id.to_string(),
            ArticleInput {
                title: Some(String::new()),
                body: Some(String::new()),
            },
        )
        .await
        .unwrap();

    let stored = EntityStore::<Node>::load(store.as_ref(), id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Heyo");
    assert_eq!(stored.body.value, "Ho");
}

#[tokio::test]
async fn update_of_someone_elses_article_is_denied() {
    let (resolver, store) = setup().await;
    let node = create(&resolver, &author(1), "Hey", "Ho").await;
    let id = node.id.unwrap();

    let outcome = resolver
        .update(&author(2), &id.to_string(), ArticleInput::new("Mine", "now"))
        .await
        .unwrap();

    assert!(outcome.entity.is_none());
    assert_eq!(
        outcome.errors,
        vec!["You do not have the necessary permissions to update this article."]
    );
    let stored = EntityStore::<Node>::load(store.as_ref(), id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Hey");
}

#[tokio::test]
async fn missing_ids_are_reported_not_raised() {
    let (resolver, _store) = setup().await;
    let actor = author(1);

    for id in ["999", "not-a-number"] {
        let updated = resolver
            .update(&actor, id, ArticleInput::new("a", "b"))
            .await
            .unwrap();
        assert!(updated.entity.is_none());
        assert_eq!(updated.errors, vec!["The requested article could not be loaded."]);

        let deleted = resolver.delete(&actor, id).await.unwrap();
        assert!(deleted.entity.is_none());
        assert_eq!(deleted.errors.len(), 1);
    }
}

#[tokio::test]
async fn other_bundles_are_not_touched() {
    let (resolver, store) = setup().await;
    let actor = author(1).with_permission("create page content");
    let pages = ArticleMutations::new(store.clone(), ArticleFieldExtractor, "page");
    let page = pages
        .create(&actor, ArticleInput::new("About", "Us"))
        .await
        .unwrap()
        .entity
        .unwrap();

    let outcome = resolver
        .delete(&actor, &page.id.unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(
        outcome.errors,
        vec!["The requested entity is not of the expected type article."]
    );
}

#[tokio::test]
async fn delete_echoes_last_state() {
    let (resolver, store) = setup().await;
    let actor = author(1);
    let node = create(&resolver, &actor, "Hey", "Ho").await;
    let id = node.id.unwrap();

    let outcome = resolver.delete(&actor, &id.to_string()).await.unwrap();

    assert!(outcome.errors.is_empty() && outcome.violations.is_empty());
    let deleted = outcome.entity.unwrap();
    assert_eq!(deleted.title, "Hey");
    assert_eq!(deleted.body.value, "Ho");
    assert!(EntityStore::<Node>::load(store.as_ref(), id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_without_permission_keeps_article() {
    let (resolver, store) = setup().await;
    let node = create(&resolver, &author(1), "Hey", "Ho").await;
    let id = node.id.unwrap();
    let editor = Actor::user(1).with_permission("edit own article content");

    let outcome = resolver.delete(&editor, &id.to_string()).await.unwrap();

    assert_eq!(
        outcome.errors,
        vec!["You do not have the necessary permissions to delete this article."]
    );
    assert!(EntityStore::<Node>::load(store.as_ref(), id)
        .await
        .unwrap()
        .is_some());
}
