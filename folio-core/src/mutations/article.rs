use serde_json::Value;

use super::entity::{EntityMutationResolver, FieldExtractor};
use crate::content::{FieldMap, Node};

pub const ARTICLE_BUNDLE: &str = "article";

/// Caller supplied article fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl ArticleInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }
}

/// `title` and `body` straight onto the node fields of the same name.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArticleFieldExtractor;

impl ArticleFieldExtractor {
    fn fields(input: ArticleInput) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), input.title.map_or(Value::Null, Value::String));
        fields.insert("body".to_string(), input.body.map_or(Value::Null, Value::String));
        fields
    }
}

impl FieldExtractor for ArticleFieldExtractor {
    type Input = ArticleInput;

    fn extract_for_create(&self, input: ArticleInput) -> FieldMap {
        Self::fields(input)
    }

    fn extract_for_update(&self, input: ArticleInput) -> FieldMap {
        // Absent and empty values leave the stored field alone
        Self::fields(input)
            .into_iter()
            .filter(|(_, value)| match value {
                Value::Null => false,
                Value::String(value) => !value.is_empty(),
                _ => true,
            })
            .collect()
    }
}

pub type ArticleMutations = EntityMutationResolver<Node, ArticleFieldExtractor>;
