#![allow(dead_code)]

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use target_query::{Cell, CatalogService, ParameterCatalog, Table, TargetQueryError};

pub const CYCLE_HEADER: &str =
    "planet_name,jwst_instrument,jwst_filter,jwst_dispersion,type,num_obs,pid,eap_months";

/// In-memory archive answering with the rows whose name appears in the query.
pub struct FakeArchive {
    known: Table,
    pub queries: RefCell<Vec<String>>,
}

impl FakeArchive {
    /// Archive knowing the given planets, with every default catalogue column filled.
    pub fn with_planets(planets: &[(&str, f64)]) -> Self {
        let expanded = ParameterCatalog::default().expand().unwrap();
        let columns: Vec<&str> = expanded.remote_ids().iter().map(String::as_str).collect();

        let rows = planets
            .iter()
            .map(|(name, radius)| {
                columns
                    .iter()
                    .map(|column| match *column {
                        "pl_name" => Cell::Text(name.to_string()),
                        "hostname" => Cell::Text(format!("host of {name}")),
                        "pl_letter" => Cell::Text("b".into()),
                        "sy_pnum" => Cell::Int(3),
                        "sy_snum" => Cell::Int(1),
                        "pl_rade" => Cell::Float(*radius),
                        id if id.ends_with("_reflink") => Cell::Text(format!("ref {id}")),
                        _ => Cell::Float(1.25),
                    })
                    .collect()
            })
            .collect();

        FakeArchive {
            known: Table::from_rows(columns, rows).unwrap(),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl CatalogService for FakeArchive {
    fn search(&self, adql_query: &str) -> Result<Table, TargetQueryError> {
        self.queries.borrow_mut().push(adql_query.to_string());

        let mut response = Table::new(self.known.columns().iter().map(String::as_str));
        for row in self.known.rows() {
            let name = row[0].to_string();
            if adql_query.contains(&format!("'{name}'")) {
                response.push_row(row.clone())?;
            }
        }
        Ok(response)
    }
}

/// Archive whose every query fails.
pub struct UnreachableArchive;

impl CatalogService for UnreachableArchive {
    fn search(&self, _adql_query: &str) -> Result<Table, TargetQueryError> {
        Err(TargetQueryError::IoError(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "archive unreachable",
        )))
    }
}

pub fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8Path::from_path(dir.path()).unwrap().to_path_buf()
}

/// Write a cycle file made of the standard header and the given target names.
pub fn write_cycle_file(input_dir: &Utf8Path, file_name: &str, targets: &[&str]) {
    std::fs::create_dir_all(input_dir).unwrap();
    let mut content = format!("{CYCLE_HEADER}\n");
    for (i, target) in targets.iter().enumerate() {
        content.push_str(&format!(
            "{target},NIRSpec,F290LP,G395H,transit,{},{},12\n",
            i + 1,
            1200 + i
        ));
    }
    std::fs::write(input_dir.join(file_name), content).unwrap();
}

/// Rows of a written CSV file as string records, header excluded.
pub fn read_records(path: &Utf8Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().clone();
    let records = reader.records().map(Result::unwrap).collect();
    (header, records)
}

pub fn field<'a>(header: &csv::StringRecord, record: &'a csv::StringRecord, column: &str) -> &'a str {
    let index = header.iter().position(|name| name == column).unwrap();
    &record[index]
}
