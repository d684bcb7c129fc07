// src/main.rs

use std::{error, io, sync::Arc};
use tokio::io::BufReader;
use tracing::info;
//
use ccs_supplier_view::{
    catalog::{self, SupplierCatalog},
    config::Config,
    driver::{Driver, HELP},
    init_tracing, HttpSource,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn error::Error>> {
    let config = Config::new()?;
    init_tracing()?;

    let mut driver = match &config.catalog_path {
        Some(path) => Driver::with_catalog(Arc::new(SupplierCatalog::from_path(path, catalog::today())?)),
        None => {
            info!(base_url = %config.base_url, "fetching suppliers over http");
            Driver::new(Arc::new(HttpSource::new(&config.base_url, config.fetch_timeout)?))
        }
    };

    let mut out = io::stdout();
    println!("{}", HELP);

    driver.load_initial(&mut out).await?;
    driver.run(BufReader::new(tokio::io::stdin()), &mut out).await?;

    Ok(())
}
