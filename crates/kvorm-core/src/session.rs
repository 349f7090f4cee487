use crate::{
    backend::{Backend, BackendError},
    error::Error,
    instance::{FieldValueError, Instance, Lifecycle},
    key::Key,
    model::meta::ModelMeta,
    obs::sink::{self, ExecKind, MetricsEvent},
    query::{load::LoadExecutor, spec::CompareOp, spec::QuerySpec},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// SessionError
///
/// Lifecycle misuse: an operation was attempted in a state that cannot
/// legally perform it.
///

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("operation requires a persisted instance (model '{model}', state: {state})")]
    InvalidOperation { model: String, state: Lifecycle },
}

///
/// Session
///
/// Unit-of-work surface over one backend driver.
///
/// `save` and `delete` are single logical units: validation happens
/// before any backend call, the commit itself is delegated to the
/// driver's atomicity, and instance state transitions only after the
/// driver reports success. A connectivity failure leaves the instance
/// exactly as it was.
///

pub struct Session<B: Backend> {
    backend: B,
}

impl<B: Backend> Session<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Lazy query over one model.
    #[must_use]
    pub const fn query(&self, spec: QuerySpec) -> LoadExecutor<'_, B> {
        LoadExecutor::new(&self.backend, spec)
    }

    /// Resolve one record by primary key.
    pub fn get(&self, meta: &Arc<ModelMeta>, key: Key) -> Result<Instance, Error> {
        self.query(QuerySpec::new(meta).by_key(key)).one()
    }

    /// Persist an instance: validate, diff, commit, transition.
    ///
    /// - New instances commit their full field set and receive a key.
    /// - Persisted instances commit only changed fields; an empty diff is
    ///   a no-error no-op that issues no commit.
    /// - Deleted instances are terminal and cannot be saved.
    pub fn save(&self, instance: &mut Instance) -> Result<(), Error> {
        if instance.state() == Lifecycle::Deleted {
            return Err(SessionError::InvalidOperation {
                model: instance.meta().name().to_string(),
                state: instance.state(),
            }
            .into());
        }

        sink::emit(MetricsEvent::ExecStart {
            kind: ExecKind::Save,
        });

        // Fail fast: all validation happens before any backend commit.
        self.validate_required(instance)?;
        self.validate_unique(instance)?;

        let diff = instance.dirty_fields();
        if instance.state() == Lifecycle::Persisted && diff.is_empty() {
            sink::emit(MetricsEvent::ExecFinish {
                kind: ExecKind::Save,
                rows: 0,
            });
            return Ok(());
        }

        let meta = Arc::clone(instance.meta());
        let key = self
            .backend
            .commit(meta.namespace(), instance.key(), &diff)
            .map_err(translate_commit_error)?;

        instance.mark_persisted(key);

        sink::emit(MetricsEvent::ExecFinish {
            kind: ExecKind::Save,
            rows: 1,
        });
        Ok(())
    }

    /// Remove a persisted instance. Terminal: the identity token becomes
    /// permanently invalid.
    pub fn delete(&self, instance: &mut Instance) -> Result<(), Error> {
        if instance.state() != Lifecycle::Persisted {
            return Err(SessionError::InvalidOperation {
                model: instance.meta().name().to_string(),
                state: instance.state(),
            }
            .into());
        }

        sink::emit(MetricsEvent::ExecStart {
            kind: ExecKind::Delete,
        });

        let key = instance.key().ok_or_else(|| SessionError::InvalidOperation {
            model: instance.meta().name().to_string(),
            state: instance.state(),
        })?;

        self.backend.remove(instance.meta().namespace(), key)?;
        instance.mark_deleted();

        sink::emit(MetricsEvent::ExecFinish {
            kind: ExecKind::Delete,
            rows: 1,
        });
        Ok(())
    }

    /// Required fields must hold a non-null value at save time.
    fn validate_required(&self, instance: &Instance) -> Result<(), Error> {
        for field in instance.meta().fields() {
            if !field.is_required() {
                continue;
            }
            let value = instance.values().value_or_null(field.name());
            if value.is_null() {
                return Err(FieldValueError::MissingRequired {
                    field: field.name().to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Per-field uniqueness, probed against the backend before commit.
    ///
    /// The instance's own record is excluded so updates do not collide
    /// with themselves.
    fn validate_unique(&self, instance: &Instance) -> Result<(), Error> {
        let meta = instance.meta();

        for field in meta.fields() {
            if !field.is_unique() {
                continue;
            }
            let value = instance.values().value_or_null(field.name());
            if value.is_null() {
                continue;
            }

            let spec = QuerySpec::new(meta).filter(field.name(), CompareOp::Eq, value)?;
            let holders = self.backend.fetch(meta.namespace(), &spec)?;

            let collision = holders
                .iter()
                .any(|record| Some(record.key) != instance.key());
            if collision {
                sink::emit(MetricsEvent::UniqueViolation);
                return Err(FieldValueError::UniqueViolation {
                    field: field.name().to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Map driver-reported commit failures into the engine taxonomy.
/// Connectivity failures pass through untranslated so callers can retry.
fn translate_commit_error(err: BackendError) -> Error {
    match err {
        BackendError::Constraint { field } => {
            sink::emit(MetricsEvent::UniqueViolation);
            FieldValueError::UniqueViolation { field }.into()
        }
        other => other.into(),
    }
}
