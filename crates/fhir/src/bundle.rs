//! Patient list pages assembled from remote search bundles.
//!
//! The remote API wraps list results in a bundle of `entry[]` plus `link[]`
//! navigation relations. `has_next`/`has_prev` derive strictly from the
//! presence of a `next`/`previous` link for that page, never from counts,
//! since the remote API does not guarantee stable counts across pages.

use crate::patient::{Patient, PatientView};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Navigation link carried by a bundle (`self`/`next`/`previous` relations).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// Page position derived from the bundle's navigation links.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of flattened patients plus the pagination envelope.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListPage {
    pub total: u64,
    pub patients: Vec<PatientView>,
    pub links: Vec<BundleLink>,
    pub pagination: Pagination,
}

/// Bundle operations.
///
/// Zero-sized namespace type, matching [`Patient`].
pub struct Bundle;

impl Bundle {
    /// Assemble a [`PatientListPage`] from a raw search bundle.
    ///
    /// Entries without a resource are skipped. `total` comes from the bundle
    /// when declared, otherwise the number of entries on this page.
    pub fn page(bundle: &Value, current_page: u32) -> PatientListPage {
        let patients: Vec<PatientView> = bundle["entry"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry["resource"].is_object())
                    .map(|entry| Patient::flatten(&entry["resource"]))
                    .collect()
            })
            .unwrap_or_default();

        let links: Vec<BundleLink> = bundle["link"]
            .as_array()
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| serde_json::from_value(link.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let has_next = has_relation(&links, "next");
        // Some servers emit "prev" instead of the standard "previous".
        let has_prev = has_relation(&links, "previous") || has_relation(&links, "prev");

        PatientListPage {
            total: bundle["total"].as_u64().unwrap_or(patients.len() as u64),
            patients,
            links,
            pagination: Pagination {
                current_page,
                has_next,
                has_prev,
            },
        }
    }
}

fn has_relation(links: &[BundleLink], relation: &str) -> bool {
    links.iter().any(|link| link.relation == relation)
}
