//! Bulk object persister implementation.
//!
//! This module provides the persister that application code uses to write
//! domain objects into a search type. Objects are transformed into documents
//! and submitted as a single bulk request per call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{BulkFailurePolicy, PersisterConfig};
use crate::errors::SearchIndexError;
use crate::interfaces::{DomainObject, ErrorLogger, ModelTransformer, ObjectPersister};
use crate::logger::TracingErrorLogger;
use crate::registry::ModelRegistry;
use crate::search_type::SearchType;
use search_sync_shared::Document;

/// Persister writing objects of one model class into one search type.
///
/// Holds only immutable configuration, so it can be shared across tasks as
/// long as the bulk client and the transformer can.
///
/// # Partial Failures
///
/// When the bulk client reports that some items of a batch failed, the
/// configured `BulkFailurePolicy` decides the outcome: `Propagate` returns the
/// error unchanged, `LogAndContinue` hands it to the logger and returns
/// `Ok(())`. Transform errors and any other client error always propagate.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use search_sync_repository::{
///     BulkFailurePolicy, BulkObjectPersister, DomainObject, JsonModelTransformer,
///     ObjectPersister, OpenSearchBulkClient, PersisterConfig, SearchType,
/// };
///
/// #[derive(serde::Serialize)]
/// struct Post {
///     id: u64,
///     title: String,
/// }
///
/// impl DomainObject for Post {
///     fn model_class(&self) -> &str {
///         "Post"
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(OpenSearchBulkClient::new("http://localhost:9200").await?);
/// let persister: BulkObjectPersister<Post> = BulkObjectPersister::new(
///     SearchType::new("app", "post", client),
///     Arc::new(JsonModelTransformer::new()),
///     "Post",
///     PersisterConfig::new(["title"]).with_failure_policy(BulkFailurePolicy::LogAndContinue),
/// );
///
/// let post = Post { id: 1, title: "Hello".to_string() };
/// persister.replace_one(&post).await?;
/// # Ok(())
/// # }
/// ```
pub struct BulkObjectPersister<O> {
    search_type: SearchType,
    transformer: Arc<dyn ModelTransformer<O>>,
    object_class: String,
    registry: Arc<ModelRegistry>,
    config: PersisterConfig,
    logger: Arc<dyn ErrorLogger>,
}

impl<O: DomainObject> BulkObjectPersister<O> {
    /// Create a persister for `object_class` objects written into `search_type`.
    ///
    /// The persister starts with an empty model registry, so it only handles
    /// objects whose class is exactly `object_class`, and logs through
    /// `TracingErrorLogger`.
    pub fn new(
        search_type: SearchType,
        transformer: Arc<dyn ModelTransformer<O>>,
        object_class: impl Into<String>,
        config: PersisterConfig,
    ) -> Self {
        Self {
            search_type,
            transformer,
            object_class: object_class.into(),
            registry: Arc::new(ModelRegistry::default()),
            config,
            logger: Arc::new(TracingErrorLogger),
        }
    }

    /// Use `registry` to resolve subclasses of the bound model class.
    pub fn with_registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the logger receiving suppressed partial failures.
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set the policy applied to partial bulk failures.
    pub fn with_failure_policy(mut self, failure_policy: BulkFailurePolicy) -> Self {
        self.config.failure_policy = failure_policy;
        self
    }

    pub fn search_type(&self) -> &SearchType {
        &self.search_type
    }

    pub fn object_class(&self) -> &str {
        &self.object_class
    }

    /// Fields passed to the transformer.
    pub fn fields(&self) -> &[String] {
        &self.config.fields
    }

    pub fn failure_policy(&self) -> BulkFailurePolicy {
        self.config.failure_policy
    }

    /// Transform an object into a document with the configured fields.
    pub fn transform_to_document(&self, object: &O) -> Result<Document, SearchIndexError> {
        Ok(self.transformer.transform(object, &self.config.fields)?)
    }

    /// Transform every object, failing on the first object that cannot be transformed.
    fn transform_all(&self, objects: &[O]) -> Result<Vec<Document>, SearchIndexError> {
        objects
            .iter()
            .map(|object| self.transform_to_document(object))
            .collect()
    }

    /// Apply the failure policy to the outcome of a bulk call.
    fn handle_bulk_result(&self, result: Result<(), SearchIndexError>) -> Result<(), SearchIndexError> {
        match result {
            Err(e) if e.is_bulk_partial_failure() => match self.config.failure_policy {
                BulkFailurePolicy::Propagate => Err(e),
                BulkFailurePolicy::LogAndContinue => {
                    self.logger.error(&e);
                    Ok(())
                }
            },
            other => other,
        }
    }
}

#[async_trait]
impl<O: DomainObject> ObjectPersister<O> for BulkObjectPersister<O> {
    fn handles_object(&self, object: &O) -> bool {
        self.registry.is_a(object.model_class(), &self.object_class)
    }

    async fn insert_one(&self, object: &O) -> Result<(), SearchIndexError> {
        self.insert_many(std::slice::from_ref(object)).await
    }

    async fn replace_one(&self, object: &O) -> Result<(), SearchIndexError> {
        self.replace_many(std::slice::from_ref(object)).await
    }

    async fn delete_one(&self, object: &O) -> Result<(), SearchIndexError> {
        self.delete_many(std::slice::from_ref(object)).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), SearchIndexError> {
        self.delete_many_by_identifiers(&[id.to_string()], None).await
    }

    async fn insert_many(&self, objects: &[O]) -> Result<(), SearchIndexError> {
        let documents = self.transform_all(objects)?;
        debug!(
            index = %self.search_type.index(),
            type_name = %self.search_type.name(),
            documents = documents.len(),
            "Inserting documents"
        );
        let result = self.search_type.add_documents(&documents).await;
        self.handle_bulk_result(result)
    }

    async fn replace_many(&self, objects: &[O]) -> Result<(), SearchIndexError> {
        let mut documents = self.transform_all(objects)?;
        for document in &mut documents {
            document.set_doc_as_upsert(true);
        }
        debug!(
            index = %self.search_type.index(),
            type_name = %self.search_type.name(),
            documents = documents.len(),
            "Replacing documents"
        );
        let result = self.search_type.update_documents(&documents).await;
        self.handle_bulk_result(result)
    }

    async fn delete_many(&self, objects: &[O]) -> Result<(), SearchIndexError> {
        let documents = self.transform_all(objects)?;
        debug!(
            index = %self.search_type.index(),
            type_name = %self.search_type.name(),
            documents = documents.len(),
            "Deleting documents"
        );
        let result = self.search_type.delete_documents(&documents).await;
        self.handle_bulk_result(result)
    }

    async fn delete_many_by_identifiers(
        &self,
        identifiers: &[String],
        routing: Option<&str>,
    ) -> Result<(), SearchIndexError> {
        debug!(
            index = %self.search_type.index(),
            type_name = %self.search_type.name(),
            identifiers = identifiers.len(),
            routing = ?routing,
            "Deleting documents by identifier"
        );
        let result = self.search_type.delete_ids(identifiers, routing).await;
        self.handle_bulk_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransformError;
    use crate::interfaces::BulkClient;
    use crate::types::{BulkFailure, BulkItemFailure};
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Article {
        class: &'static str,
        id: String,
        title: String,
    }

    impl Article {
        fn new(id: &str, title: &str) -> Self {
            Self {
                class: "Article",
                id: id.to_string(),
                title: title.to_string(),
            }
        }
    }

    impl DomainObject for Article {
        fn model_class(&self) -> &str {
            self.class
        }
    }

    /// Transformer that copies the title and counts its calls
    #[derive(Default)]
    struct MockTransformer {
        calls: AtomicUsize,
    }

    impl ModelTransformer<Article> for MockTransformer {
        fn transform(&self, object: &Article, fields: &[String]) -> Result<Document, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if object.title.is_empty() {
                return Err(TransformError::missing_field("title"));
            }
            let mut data = Map::new();
            for field in fields {
                data.insert(field.clone(), json!(object.title));
            }
            Ok(Document::new(object.id.clone(), data))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Failure {
        None,
        Partial,
        Connection,
        MissingObjects,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(Vec<Document>),
        Update(Vec<Document>),
        Delete(Vec<Document>),
        DeleteIds {
            identifiers: Vec<String>,
            index: String,
            type_name: String,
            routing: Option<String>,
        },
    }

    /// Mock bulk client for testing
    struct MockBulkClient {
        calls: Mutex<Vec<Call>>,
        failure: Failure,
    }

    impl MockBulkClient {
        fn new(failure: Failure) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failure,
            }
        }

        fn outcome(&self) -> Result<(), SearchIndexError> {
            match self.failure {
                Failure::None => Ok(()),
                Failure::Partial => Err(SearchIndexError::bulk_partial_failure(BulkFailure::new(
                    "Bulk request had failures",
                    vec![BulkItemFailure::new("1", "index", 400, "mapper_parsing_exception")],
                ))),
                Failure::Connection => Err(SearchIndexError::connection("Mock failure")),
                Failure::MissingObjects => Err(SearchIndexError::missing_objects(
                    "Cannot find corresponding objects",
                    ["7"],
                )),
            }
        }
    }

    #[async_trait]
    impl BulkClient for MockBulkClient {
        async fn add_documents(
            &self,
            _index: &str,
            _type_name: &str,
            documents: &[Document],
        ) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(Call::Add(documents.to_vec()));
            self.outcome()
        }

        async fn update_documents(
            &self,
            _index: &str,
            _type_name: &str,
            documents: &[Document],
        ) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(Call::Update(documents.to_vec()));
            self.outcome()
        }

        async fn delete_documents(
            &self,
            _index: &str,
            _type_name: &str,
            documents: &[Document],
        ) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(Call::Delete(documents.to_vec()));
            self.outcome()
        }

        async fn delete_ids(
            &self,
            identifiers: &[String],
            index: &str,
            type_name: &str,
            routing: Option<&str>,
        ) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(Call::DeleteIds {
                identifiers: identifiers.to_vec(),
                index: index.to_string(),
                type_name: type_name.to_string(),
                routing: routing.map(str::to_string),
            });
            self.outcome()
        }
    }

    /// Logger recording every error it receives
    #[derive(Default)]
    struct RecordingLogger {
        errors: std::sync::Mutex<Vec<SearchIndexError>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn error(&self, error: &SearchIndexError) {
            self.errors.lock().unwrap().push(error.clone());
        }
    }

    struct Fixture {
        client: Arc<MockBulkClient>,
        transformer: Arc<MockTransformer>,
        logger: Arc<RecordingLogger>,
        persister: BulkObjectPersister<Article>,
    }

    fn fixture(failure: Failure, policy: BulkFailurePolicy) -> Fixture {
        let client = Arc::new(MockBulkClient::new(failure));
        let transformer = Arc::new(MockTransformer::default());
        let logger = Arc::new(RecordingLogger::default());
        let persister = BulkObjectPersister::new(
            SearchType::new("app", "article", client.clone()),
            transformer.clone(),
            "Article",
            PersisterConfig::new(["title"]).with_failure_policy(policy),
        )
        .with_logger(logger.clone());

        Fixture {
            client,
            transformer,
            logger,
            persister,
        }
    }

    fn expected_document(id: &str, title: &str) -> Document {
        let mut data = Map::new();
        data.insert("title".to_string(), json!(title));
        Document::new(id, data)
    }

    #[tokio::test]
    async fn test_insert_many_preserves_order() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);
        let objects = vec![Article::new("1", "First"), Article::new("2", "Second")];

        f.persister.insert_many(&objects).await.unwrap();

        let calls = f.client.calls.lock().await;
        assert_eq!(
            *calls,
            vec![Call::Add(vec![
                expected_document("1", "First"),
                expected_document("2", "Second"),
            ])]
        );
    }

    #[tokio::test]
    async fn test_insert_many_fails_fast_on_transform_error() {
        let f = fixture(Failure::None, BulkFailurePolicy::LogAndContinue);
        let objects = vec![
            Article::new("1", "First"),
            Article::new("2", ""),
            Article::new("3", "Third"),
        ];

        let result = f.persister.insert_many(&objects).await;

        assert!(matches!(result, Err(SearchIndexError::Transform(_))));
        assert!(f.client.calls.lock().await.is_empty());
        assert_eq!(f.transformer.calls.load(Ordering::SeqCst), 2);
        assert!(f.logger.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_many_sets_upsert() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);

        f.persister
            .replace_many(&[Article::new("1", "First")])
            .await
            .unwrap();
        f.persister
            .insert_many(&[Article::new("1", "First")])
            .await
            .unwrap();

        let calls = f.client.calls.lock().await;
        match &calls[0] {
            Call::Update(documents) => {
                assert_eq!(documents.len(), 1);
                assert!(documents[0].doc_as_upsert);
            }
            other => panic!("Expected update call, got {:?}", other),
        }
        match &calls[1] {
            Call::Add(documents) => assert!(!documents[0].doc_as_upsert),
            other => panic!("Expected add call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_many_transforms_objects() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);

        f.persister
            .delete_many(&[Article::new("4", "Gone"), Article::new("5", "Also gone")])
            .await
            .unwrap();

        let calls = f.client.calls.lock().await;
        assert_eq!(
            *calls,
            vec![Call::Delete(vec![
                expected_document("4", "Gone"),
                expected_document("5", "Also gone"),
            ])]
        );
        assert_eq!(f.transformer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_object_wrappers() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);
        let article = Article::new("1", "First");

        f.persister.insert_one(&article).await.unwrap();
        f.persister.replace_one(&article).await.unwrap();
        f.persister.delete_one(&article).await.unwrap();
        f.persister.delete_by_id("9").await.unwrap();

        let calls = f.client.calls.lock().await;
        assert_eq!(calls.len(), 4);
        assert!(matches!(&calls[0], Call::Add(docs) if docs.len() == 1));
        assert!(matches!(&calls[1], Call::Update(docs) if docs.len() == 1));
        assert!(matches!(&calls[2], Call::Delete(docs) if docs.len() == 1));
        assert_eq!(
            calls[3],
            Call::DeleteIds {
                identifiers: vec!["9".to_string()],
                index: "app".to_string(),
                type_name: "article".to_string(),
                routing: None,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_many_by_identifiers_with_routing() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);
        let identifiers = vec!["1".to_string(), "2".to_string(), "3".to_string()];

        f.persister
            .delete_many_by_identifiers(&identifiers, Some("r"))
            .await
            .unwrap();

        let calls = f.client.calls.lock().await;
        assert_eq!(
            *calls,
            vec![Call::DeleteIds {
                identifiers,
                index: "app".to_string(),
                type_name: "article".to_string(),
                routing: Some("r".to_string()),
            }]
        );
        assert_eq!(f.transformer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_logged_and_swallowed() {
        let f = fixture(Failure::Partial, BulkFailurePolicy::LogAndContinue);

        let result = f.persister.insert_many(&[Article::new("1", "First")]).await;

        assert!(result.is_ok());
        let errors = f.logger.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_bulk_partial_failure());
    }

    #[tokio::test]
    async fn test_partial_failure_policy_applies_to_all_bulk_operations() {
        let f = fixture(Failure::Partial, BulkFailurePolicy::LogAndContinue);
        let article = Article::new("1", "First");

        f.persister.replace_many(&[article.clone()]).await.unwrap();
        f.persister.delete_many(&[article]).await.unwrap();
        f.persister
            .delete_many_by_identifiers(&["1".to_string()], None)
            .await
            .unwrap();

        assert_eq!(f.logger.errors.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_partial_failure_propagated() {
        let f = fixture(Failure::Partial, BulkFailurePolicy::Propagate);

        let result = f.persister.insert_many(&[Article::new("1", "First")]).await;

        let error = result.unwrap_err();
        assert_eq!(error.bulk_failure().map(|failure| failure.failed_ids()), Some(vec!["1"]));
        assert!(f.logger.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generic_error_always_propagated() {
        let f = fixture(Failure::Connection, BulkFailurePolicy::LogAndContinue);

        let result = f.persister.replace_many(&[Article::new("1", "First")]).await;

        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
        assert!(f.logger.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_objects_always_propagated() {
        let f = fixture(Failure::MissingObjects, BulkFailurePolicy::LogAndContinue);

        let result = f
            .persister
            .delete_many_by_identifiers(&["7".to_string()], None)
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.missing_identifiers(), Some(&["7".to_string()][..]));
        assert!(f.logger.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_handles_object() {
        let client = Arc::new(MockBulkClient::new(Failure::None));
        let registry = ModelRegistry::new()
            .with_model("Article")
            .with_subclass("Review", "Article")
            .with_model("User");
        let persister: BulkObjectPersister<Article> = BulkObjectPersister::new(
            SearchType::new("app", "article", client),
            Arc::new(MockTransformer::default()),
            "Article",
            PersisterConfig::default(),
        )
        .with_registry(Arc::new(registry));

        let mut review = Article::new("1", "Great");
        review.class = "Review";
        let mut user = Article::new("2", "Someone");
        user.class = "User";

        assert!(persister.handles_object(&Article::new("3", "Plain")));
        assert!(persister.handles_object(&review));
        assert!(!persister.handles_object(&user));
    }

    #[test]
    fn test_transform_to_document_uses_configured_fields() {
        let f = fixture(Failure::None, BulkFailurePolicy::Propagate);

        let document = f
            .persister
            .transform_to_document(&Article::new("1", "First"))
            .unwrap();

        assert_eq!(document, expected_document("1", "First"));
        assert_eq!(f.persister.fields(), &["title".to_string()]);
    }

    #[test]
    fn test_accessors_expose_construction_values() {
        let f = fixture(Failure::None, BulkFailurePolicy::LogAndContinue);

        assert_eq!(f.persister.search_type().index(), "app");
        assert_eq!(f.persister.search_type().name(), "article");
        assert_eq!(f.persister.object_class(), "Article");
        assert_eq!(
            f.persister.failure_policy(),
            BulkFailurePolicy::LogAndContinue
        );

        let persister = f
            .persister
            .with_failure_policy(BulkFailurePolicy::Propagate);
        assert_eq!(persister.failure_policy(), BulkFailurePolicy::Propagate);
    }
}
