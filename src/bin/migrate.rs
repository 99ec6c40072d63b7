use aero_delivery_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::admin_account_service::ensure_master_admin,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    println!("Migrations applied");

    if ensure_master_admin(&orm, &config).await? {
        println!("Master admin {} created", config.master_admin_email);
    }
    orm.close().await?;
    Ok(())
}
