//! Interface definitions for the collaborators of the search sync core.
//!
//! These traits allow dependency injection of the bulk-write backend, the
//! object-to-document transformer and the diagnostic logger, and define the
//! `ObjectPersister` contract implemented by `BulkObjectPersister`.

mod bulk_client;
mod domain_object;
mod error_logger;
mod model_transformer;
mod object_persister;

pub use bulk_client::BulkClient;
pub use domain_object::DomainObject;
pub use error_logger::ErrorLogger;
pub use model_transformer::ModelTransformer;
pub use object_persister::ObjectPersister;
