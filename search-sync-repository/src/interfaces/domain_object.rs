//! Domain object trait definition.

/// A record owned by an external data layer that can be persisted into the index.
///
/// The only capability the core needs is the name of the object's model
/// class, which persisters check against their bound class through a
/// `ModelRegistry`.
pub trait DomainObject: Send + Sync {
    /// Name of the model class of this object.
    fn model_class(&self) -> &str;
}
