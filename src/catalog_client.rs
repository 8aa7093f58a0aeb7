//! # Remote catalogue client
//!
//! [`CatalogClient`] turns a list of target names into an enriched parameter table:
//!
//! 1. build one ADQL query for the whole list ([`construct_adql_query`]),
//! 2. run it through a [`CatalogService`],
//! 3. compare the returned names with the requested ones and log the lost targets,
//! 4. rename the archive columns to their local names ([`ExpandedCatalog`]).
//!
//! ## Lost targets
//! -----------------
//! The archive silently drops names it does not know (target not yet catalogued, ambiguous
//! designation, ...). This is normal behaviour: the client only emits a warning listing every
//! requested name absent from the response and carries on. A failure of the query itself is
//! propagated.
use std::collections::HashSet;

use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    constants::REMOTE_NAME_COLUMN,
    parameter_catalog::{ExpandedCatalog, ParameterCatalog},
    query_builder::construct_adql_query,
    table::Table,
    tap_service::CatalogService,
    target_query_errors::TargetQueryError,
};

/// Requested names absent from the `pl_name` column of a raw response, sorted and unique.
pub fn lost_targets<S: AsRef<str>>(
    requested: &[S],
    response: &Table,
) -> Result<Vec<String>, TargetQueryError> {
    let returned: HashSet<String> = response
        .unique_keys(REMOTE_NAME_COLUMN)?
        .into_iter()
        .collect();

    Ok(requested
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !returned.contains(*name))
        .map(str::to_string)
        .sorted()
        .dedup()
        .collect())
}

/// Client querying a [`CatalogService`] with the expanded parameter catalogue.
#[derive(Debug)]
pub struct CatalogClient<S: CatalogService> {
    service: S,
    catalog: ExpandedCatalog,
}

impl<S: CatalogService> CatalogClient<S> {
    /// Build a client, expanding the catalogue once.
    ///
    /// Return
    /// ----------
    /// * The client, or the configuration error raised by [`ParameterCatalog::expand`].
    pub fn new(service: S, catalog: &ParameterCatalog<'_>) -> Result<Self, TargetQueryError> {
        Ok(CatalogClient {
            service,
            catalog: catalog.expand()?,
        })
    }

    pub fn catalog(&self) -> &ExpandedCatalog {
        &self.catalog
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Query the archive for a set of distinct target names.
    ///
    /// Arguments
    /// -----------------
    /// * `target_names` – Deduplicated target names, in first-seen order.
    ///
    /// Return
    /// ----------
    /// * The response table with local column names. An empty name list does not contact the
    ///   service and yields an empty table carrying the expanded schema.
    /// * Any [`TargetQueryError`] raised by the service, or
    ///   [`TargetQueryError::MissingColumn`] if the response has no `pl_name` column.
    ///
    /// See also
    /// ------------
    /// * [`lost_targets`] – Names reported in the warning.
    pub fn query_targets<N: AsRef<str>>(
        &self,
        target_names: &[N],
    ) -> Result<Table, TargetQueryError> {
        let names: Vec<&str> = target_names.iter().map(|name| name.as_ref()).collect();
        info!(
            "Querying NASA EPA for {} targets:\n{:?}",
            names.len(),
            names
        );

        if names.is_empty() {
            info!("No target to query, skipping the request");
            return Ok(Table::new(self.catalog.local_names()));
        }

        let adql_query = construct_adql_query(&names, &self.catalog);
        let mut response = self.service.search(&adql_query)?;

        let lost = lost_targets(&names, &response)?;
        if lost.is_empty() {
            info!("All targets queried successfully!");
        } else {
            warn!(
                "The following {} target(s) could not be queried in the EPA:\n{:?}",
                lost.len(),
                lost
            );
        }

        response.rename_columns(self.catalog.mapping());
        Ok(response)
    }
}

#[cfg(test)]
mod catalog_client_test {
    use std::cell::RefCell;

    use super::*;
    use crate::{parameter_catalog::Designation, table::Cell};

    struct RecordingService {
        response: Table,
        queries: RefCell<Vec<String>>,
    }

    impl CatalogService for RecordingService {
        fn search(&self, adql_query: &str) -> Result<Table, TargetQueryError> {
            self.queries.borrow_mut().push(adql_query.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingService;

    impl CatalogService for FailingService {
        fn search(&self, _adql_query: &str) -> Result<Table, TargetQueryError> {
            Err(TargetQueryError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "archive unreachable",
            )))
        }
    }

    fn small_catalog() -> ParameterCatalog<'static> {
        ParameterCatalog::new(vec![
            ("pl_name", Designation::Identity("planet_name")),
            (
                "pl_rade",
                Designation::Quantity {
                    name: "radius",
                    unit: "rearth",
                },
            ),
        ])
    }

    fn response(names: &[&str]) -> Table {
        Table::from_rows(
            ["pl_name", "pl_rade", "pl_radeerr1", "pl_radeerr2", "pl_rade_reflink"],
            names
                .iter()
                .map(|name| {
                    vec![
                        Cell::Text(name.to_string()),
                        Cell::Float(1.5),
                        Cell::Float(0.1),
                        Cell::Float(-0.1),
                        Cell::Text("ref".into()),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_lost_targets() {
        let table = response(&["A", "C"]);
        assert_eq!(
            lost_targets(&["B", "A", "D", "B"], &table).unwrap(),
            vec!["B".to_string(), "D".to_string()]
        );
        assert!(lost_targets(&["A"], &table).unwrap().is_empty());
    }

    #[test]
    fn test_query_renames_columns() {
        let service = RecordingService {
            response: response(&["A"]),
            queries: RefCell::new(Vec::new()),
        };
        let client = CatalogClient::new(service, &small_catalog()).unwrap();

        let table = client.query_targets(&["A", "B"]).unwrap();
        assert_eq!(
            table.columns(),
            [
                "planet_name",
                "radius_rearth",
                "radius_errpos",
                "radius_errneg",
                "radius_ref"
            ]
        );
        assert_eq!(table.len(), 1);

        let queries = client.service().queries.borrow();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].ends_with("WHERE pl_name IN ('A','B')"));
    }

    #[test]
    fn test_empty_request_skips_service() {
        let client = CatalogClient::new(FailingService, &small_catalog()).unwrap();
        let table = client.query_targets::<&str>(&[]).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 5);
        assert!(table.has_column("planet_name"));
    }

    #[test]
    fn test_service_failure_propagates() {
        let client = CatalogClient::new(FailingService, &small_catalog()).unwrap();
        let result = client.query_targets(&["A"]);

        assert!(matches!(result, Err(TargetQueryError::IoError(_))));
    }

    #[test]
    fn test_response_without_name_column() {
        let service = RecordingService {
            response: Table::new(["hostname"]),
            queries: RefCell::new(Vec::new()),
        };
        let client = CatalogClient::new(service, &small_catalog()).unwrap();

        assert_eq!(
            client.query_targets(&["A"]),
            Err(TargetQueryError::MissingColumn("pl_name".into()))
        );
    }

    #[test]
    fn test_invalid_catalog() {
        let catalog = ParameterCatalog::new(vec![("st_teff", Designation::Identity("teff"))]);
        assert!(matches!(
            CatalogClient::new(FailingService, &catalog),
            Err(TargetQueryError::MalformedCatalogEntry(..))
        ));
    }

    #[cfg(feature = "epa-network")]
    #[test]
    fn test_epa_request() {
        use crate::tap_service::TapService;

        let client = CatalogClient::new(TapService::default(), &ParameterCatalog::default()).unwrap();
        let table = client
            .query_targets(&["55 Cnc e", "GJ 1214 b", "Not A Planet b"])
            .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("star-teff_kelvin"));
        assert_eq!(table.unique_keys("planet_name").unwrap().len(), 2);
    }
}
