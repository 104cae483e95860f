//! Database migration runner for Folio.
//!
//! Usage:
//!   migrator up      - Apply the portfolio schema
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-apply
//!
//! Reads `DATABASE_URL` (a `.env` file is honored).

use sea_orm_migration::prelude::*;
use folio_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing
    cli::run_cli(Migrator).await;
}
