//! Temporary databases for `PostgreSQL` adapter tests.
//!
//! Every test gets its own database cloned from a migrated template on the
//! shared embedded cluster. When the tests run as root, `PG_EMBEDDED_WORKER`
//! must name the `pg_worker` helper so the cluster can drop privileges.

use cohort::config::DatabaseSettings;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pg_embedded_setup_unpriv::TestCluster;
pub use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use std::future::Future;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Schema applied to the template database.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_create_users_and_tasks/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "cohort_test_template";

/// Connection pool shared by both repositories.
pub type TestPool = Pool<ConnectionManager<PgConnection>>;

/// A migrated database that is dropped again when the value goes away.
///
/// Fields drop in order, so the pool closes its connections before the
/// database is dropped.
pub struct TestDatabase {
    pool: TestPool,
    runtime: Runtime,
    _guard: DropDatabase,
}

impl TestDatabase {
    /// Returns a pool connected to the temporary database.
    #[must_use]
    pub fn pool(&self) -> TestPool {
        self.pool.clone()
    }

    /// Drives `future` to completion on the database's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

struct DropDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl Drop for DropDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Clones a fresh database from the migrated template.
///
/// # Errors
///
/// Returns an error when the template cannot be migrated or the database
/// cannot be created or connected to.
#[fixture]
pub fn test_database(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<TestDatabase> {
    let cluster = shared_test_cluster;
    ensure_template(cluster)?;
    let name = format!("cohort_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database_from_template(name.as_str(), TEMPLATE_DB)
        .map_err(|err| eyre::eyre!("failed to create {name}: {err}"))?;
    let settings = DatabaseSettings {
        url: Some(cluster.connection().database_url(&name)),
        pool_size: 2,
    };
    let guard = DropDatabase { cluster, name };

    let pool = settings
        .connection_pool()?
        .ok_or_else(|| eyre::eyre!("a configured URL should yield a pool"))?;
    Ok(TestDatabase {
        pool,
        runtime: tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?,
        _guard: guard,
    })
}

fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut connection =
                PgConnection::establish(&url).map_err(|err| eyre::eyre!("{err}"))?;
            connection
                .batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|err| eyre::eyre!("migration failed: {err}"))?;
            Ok(())
        })
        .map_err(|err| eyre::eyre!("template setup failed: {err}"))
}
