use sea_orm_migration::prelude::*;

use rydroo_trips_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
