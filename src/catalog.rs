// src/catalog.rs

use std::{collections::{BTreeMap, HashMap}, io::Read, path::Path};
use chrono::{Datelike, Local, NaiveDate};
use futures::future::{self, BoxFuture};
use serde::Deserialize;
use tracing::info;
//
use crate::{
    error::{Result, ViewError},
    source::SupplierSource,
    supplier::{DetailValue, Supplier},
};

/// One row of `suppliers.csv`.
#[derive(Clone, Debug, Deserialize)]
pub struct SupplierRow {
    pub framework: String,
    pub name: String,
    pub color: String,
    pub buyer_name: String,
    pub contract_value: f64,
    #[serde(alias = "contract_start_date")]
    pub contract_start: String,
    #[serde(alias = "contract_end_date")]
    pub contract_end: String,
    pub reported_spend: f64,
    #[serde(default)]
    pub suggested_email: Option<String>,
}

/// Suppliers grouped by framework, shaped as the `/suppliers/{framework}`
/// endpoint returns them.
#[derive(Clone, Debug, Default)]
pub struct SupplierCatalog {
    frameworks: BTreeMap<String, Vec<Supplier>>,
}

impl SupplierCatalog {
    pub fn from_path(path: impl AsRef<Path>, today: NaiveDate) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_reader(std::fs::File::open(path)?, today)?;

        info!(path = %path.display(), frameworks = catalog.frameworks.len(), "supplier catalog loaded");

        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R, today: NaiveDate) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut frameworks: BTreeMap<String, Vec<Supplier>> = BTreeMap::new();

        for row in rdr.deserialize::<SupplierRow>() {
            let row = row?;
            frameworks
                .entry(row.framework.clone())
                .or_default()
                .push(supplier_from_row(row, today)?);
        }

        Ok(Self { frameworks })
    }

    /// Framework names in sorted order.
    pub fn frameworks(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }

    /// Suppliers for `framework`; unknown frameworks have none.
    pub fn suppliers(&self, framework: &str) -> Vec<Supplier> {
        self.frameworks.get(framework).cloned().unwrap_or_default()
    }
}

impl SupplierSource for SupplierCatalog {
    fn fetch<'a>(&'a self, framework: &'a str) -> BoxFuture<'a, Result<Vec<Supplier>>> {
        Box::pin(future::ready(Ok(self.suppliers(framework))))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole calendar months between the contract start and `today`.
pub fn months_run(start: NaiveDate, today: NaiveDate) -> i32 {
    (today.year() - start.year()) * 12 + (today.month() as i32 - start.month() as i32)
}

fn supplier_from_row(row: SupplierRow, today: NaiveDate) -> Result<Supplier> {
    let start = NaiveDate::parse_from_str(&row.contract_start, "%Y-%m-%d").map_err(|_| {
        ViewError::InvalidDate {
            supplier: row.name.clone(),
            value: row.contract_start.clone(),
        }
    })?;

    let mut details: HashMap<String, DetailValue> = HashMap::new();
    details.insert("Buyer name".into(), row.buyer_name.into());
    details.insert("Contract value".into(), row.contract_value.into());
    details.insert("Contract start".into(), row.contract_start.into());
    details.insert("Contract end".into(), row.contract_end.into());
    details.insert("Reported spend".into(), row.reported_spend.into());
    details.insert("Months Run So Far".into(), f64::from(months_run(start, today)).into());

    if let Some(email) = row.suggested_email.filter(|e| !e.is_empty()) {
        details.insert("Suggested email".into(), email.into());
    }

    Ok(Supplier {
        name: row.name,
        color: row.color,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
framework,name,color,buyer_name,contract_value,contract_start,contract_end,reported_spend
RM6187,Acme Ltd,green,Home Office,1000,2024-01-15,2026-01-14,250.5
RM6116,Beta plc,amber,HMRC,50000,2023-11-01,2025-10-31,0
RM6187,Gamma LLP,red,Ministry of Justice,7500.25,2025-06-30,2027-06-29,100
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn groups_by_framework_in_file_order() {
        let catalog = SupplierCatalog::from_reader(CSV.as_bytes(), date(2025, 10, 17)).unwrap();

        assert_eq!(catalog.frameworks().collect::<Vec<_>>(), ["RM6116", "RM6187"]);

        let names: Vec<String> = catalog.suppliers("RM6187").into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Acme Ltd", "Gamma LLP"]);
        assert!(catalog.suppliers("RM9999").is_empty());
    }

    #[test]
    fn builds_detail_map() {
        let catalog = SupplierCatalog::from_reader(CSV.as_bytes(), date(2025, 10, 17)).unwrap();
        let suppliers = catalog.suppliers("RM6187");
        let acme = &suppliers[0];

        assert_eq!(acme.color, "green");
        assert_eq!(acme.details["Buyer name"], DetailValue::from("Home Office"));
        assert_eq!(acme.details["Contract value"], DetailValue::Number(1000.0));
        assert_eq!(acme.details["Contract start"], DetailValue::from("2024-01-15"));
        assert_eq!(acme.details["Reported spend"], DetailValue::Number(250.5));
        assert_eq!(acme.details["Months Run So Far"], DetailValue::Number(21.0));
        assert!(!acme.details.contains_key("Suggested email"));
    }

    #[test]
    fn months_run_counts_calendar_months() {
        assert_eq!(months_run(date(2024, 1, 31), date(2024, 2, 1)), 1);
        assert_eq!(months_run(date(2023, 11, 1), date(2025, 10, 17)), 23);
        assert_eq!(months_run(date(2026, 1, 1), date(2025, 12, 1)), -1);
    }

    #[test]
    fn bad_start_date_names_the_supplier() {
        let csv = "framework,name,color,buyer_name,contract_value,contract_start,contract_end,reported_spend\n\
                   RM6187,Acme Ltd,green,Home Office,1000,15/01/2024,2026-01-14,0\n";

        let err = SupplierCatalog::from_reader(csv.as_bytes(), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, ViewError::InvalidDate { supplier, .. } if supplier == "Acme Ltd"));
    }

    #[test]
    fn optional_email_column_is_used() {
        let csv = "framework,name,color,buyer_name,contract_value,contract_start,contract_end,reported_spend,suggested_email\n\
                   RM6187,Acme Ltd,green,Home Office,1000,2024-01-15,2026-01-14,0,sales@acme.example\n\
                   RM6187,Beta plc,amber,HMRC,1000,2024-01-15,2026-01-14,0,\n";

        let catalog = SupplierCatalog::from_reader(csv.as_bytes(), date(2025, 1, 1)).unwrap();
        let suppliers = catalog.suppliers("RM6187");

        assert_eq!(suppliers[0].details["Suggested email"], DetailValue::from("sales@acme.example"));
        assert!(!suppliers[1].details.contains_key("Suggested email"));
    }

    #[test]
    fn loads_from_a_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let catalog = SupplierCatalog::from_path(file.path(), date(2025, 10, 17)).unwrap();
        assert_eq!(catalog.frameworks().count(), 2);

        let missing = SupplierCatalog::from_path(file.path().with_extension("missing"), date(2025, 10, 17));
        assert!(matches!(missing, Err(ViewError::Io(_))));
    }

    #[tokio::test]
    async fn serves_as_a_supplier_source() {
        let catalog = SupplierCatalog::from_reader(CSV.as_bytes(), date(2025, 10, 17)).unwrap();
        let suppliers = catalog.fetch("RM6116").await.unwrap();

        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name, "Beta plc");
    }
}
