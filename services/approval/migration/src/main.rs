use sea_orm_migration::prelude::*;

use fanpage_approval_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
