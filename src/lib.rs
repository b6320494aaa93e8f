#[macro_use]
extern crate diesel;

use anyhow::anyhow;
use diesel::connection::SimpleConnection;
use diesel::prelude::SqliteConnection;
use diesel::r2d2;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod auth;
pub mod categories;
pub mod comments;
pub mod config;
pub mod constants;
pub mod errors;
pub mod handler;
pub mod handlers;
pub mod media_util;
pub mod models;
pub mod pagination;
pub mod post_util;
pub mod posts;
pub mod routes;
pub mod schema;
pub mod tags;
pub mod templates;
pub mod view_models;

#[cfg(test)]
mod test_util;

pub use crate::config::BlogConfig;
pub use crate::constants::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every connection the pool opens.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn new_dbconn_pool(
    db_file: &str,
) -> Result<r2d2::Pool<r2d2::ConnectionManager<SqliteConnection>>, anyhow::Error> {
    let manager = r2d2::ConnectionManager::<SqliteConnection>::new(db_file);
    Ok(r2d2::Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), anyhow::Error> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| anyhow!(e))?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}
