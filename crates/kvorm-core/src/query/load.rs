use crate::{
    backend::Backend,
    error::Error,
    instance::Instance,
    obs::sink::{self, ExecKind, MetricsEvent},
    query::spec::{QueryError, QuerySpec},
    serialize,
    value::FieldMap,
};

///
/// LoadExecutor
///
/// Consumption surface for one query specification.
///
/// Holding an executor performs no I/O. Every consuming call (`all`,
/// `iter`, `count`, `one`) issues exactly one fresh backend fetch, so a
/// spec can be re-consumed and always reflects current backend state
/// (restartable, never cached).
///

pub struct LoadExecutor<'a, B: Backend> {
    backend: &'a B,
    spec: QuerySpec,
}

impl<'a, B: Backend> LoadExecutor<'a, B> {
    #[must_use]
    pub const fn new(backend: &'a B, spec: QuerySpec) -> Self {
        Self { backend, spec }
    }

    #[must_use]
    pub const fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Materialize every matching instance.
    pub fn all(&self) -> Result<Vec<Instance>, Error> {
        self.fetch()
    }

    /// Materialize and iterate. Each call re-resolves against the backend.
    pub fn iter(&self) -> Result<std::vec::IntoIter<Instance>, Error> {
        Ok(self.fetch()?.into_iter())
    }

    /// Count matching records; issues one fetch.
    pub fn count(&self) -> Result<usize, Error> {
        Ok(self.fetch()?.len())
    }

    /// Resolve exactly one match.
    ///
    /// Zero matches and multiple matches are explicit errors; an arbitrary
    /// element is never returned silently.
    pub fn one(&self) -> Result<Instance, Error> {
        let mut rows = self.fetch()?;

        match rows.len() {
            0 => Err(QueryError::DoesNotExist.into()),
            1 => Ok(rows.remove(0)),
            count => Err(QueryError::MultipleInstancesFound { count }.into()),
        }
    }

    /// One backend round trip: fetch raw records and decode instances.
    fn fetch(&self) -> Result<Vec<Instance>, Error> {
        sink::emit(MetricsEvent::ExecStart {
            kind: ExecKind::Load,
        });

        let meta = self.spec.meta();
        let records = self.backend.fetch(meta.namespace(), &self.spec)?;

        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let values: FieldMap = serialize::deserialize(&record.bytes)?;
            out.push(Instance::from_stored(meta, record.key, values));
        }

        sink::emit(MetricsEvent::ExecFinish {
            kind: ExecKind::Load,
            rows: out.len() as u64,
        });

        Ok(out)
    }
}
