use async_graphql::*;
use chrono::{DateTime, Utc};

use folio::content::{BodyField, Node};
use folio::mutations;

/// A formatted long text value.
#[derive(SimpleObject, Clone, Debug)]
pub struct TextField {
    pub value: String,
    pub format: Option<String>,
}

impl From<BodyField> for TextField {
    fn from(body: BodyField) -> Self {
        Self {
            value: body.value,
            format: body.format,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct NodeArticle {
    pub id: String,
    pub title: String,
    pub body: TextField,
    pub published: bool,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    #[graphql(name = "ownerId")]
    pub owner_id: Option<i32>,
}

impl From<Node> for NodeArticle {
    fn from(node: Node) -> Self {
        Self {
            id: node.id.map(|id| id.to_string()).unwrap_or_default(),
            title: node.title,
            body: TextField::from(node.body),
            published: node.published,
            created: node.created_at,
            changed: node.updated_at,
            owner_id: node.owner_id,
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl From<ArticleInput> for mutations::ArticleInput {
    fn from(input: ArticleInput) -> Self {
        Self {
            title: input.title,
            body: input.body,
        }
    }
}
