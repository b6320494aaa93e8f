use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use log::error;

use crate::errors::BlogError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub trait WithDB {
    fn dbpool(&self) -> &DbPool;

    fn dbconn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, BlogError> {
        self.dbpool().get().map_err(|e| {
            error!("{:?}", e);
            BlogError::from(e)
        })
    }
}

/// Handle to the connection pool shared by all request handlers.
#[derive(Clone)]
pub struct BlogDB {
    dbpool: Arc<DbPool>,
}

impl BlogDB {
    pub fn new(dbpool: Arc<DbPool>) -> Self {
        Self { dbpool }
    }

    /// Runs `f` on a pooled connection off the async executor.
    pub async fn run<T, F>(&self, f: F) -> Result<T, BlogError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, BlogError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio_rayon::spawn(move || {
            let mut conn = db.dbconn()?;
            f(&mut conn)
        })
        .await
    }
}

impl WithDB for BlogDB {
    fn dbpool(&self) -> &DbPool {
        &self.dbpool
    }
}
