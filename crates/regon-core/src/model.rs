// ── Registry record types ──
//
// Field names follow the normalized registry field names, so the structs
// serialize to the same keys the service's documentation uses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flattened `dane` element: normalized field name to raw text, in
/// document order.
pub type Record = IndexMap<String, Option<String>>;

/// One search result row.
///
/// Every field is optional because the projection tolerates fields the
/// service leaves out (the sandbox has no `ulica`, for example). Missing
/// keys deserialize as `None`, so a record built from any map with the
/// right keys is accepted by the report lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySummary {
    pub regon: Option<String>,
    pub nip: Option<String>,
    pub status_nip: Option<String>,
    pub nazwa: Option<String>,
    /// Entity kind code: `F`, `LF`, `P` or `LP`.
    pub typ: Option<String>,
    /// Legal basis of operation for individuals (`1`..`4`); `6` for legal persons.
    pub silos_id: Option<String>,
    pub wojewodztwo: Option<String>,
    pub powiat: Option<String>,
    pub gmina: Option<String>,
    pub miejscowosc: Option<String>,
    pub kod_pocztowy: Option<String>,
    pub ulica: Option<String>,
    pub nr_nieruchomosci: Option<String>,
    pub nr_lokalu: Option<String>,
    pub data_zakonczenia_dzialalnosci: Option<String>,
}

impl EntitySummary {
    /// Value of a field by its registry name, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "regon" => &self.regon,
            "nip" => &self.nip,
            "status_nip" => &self.status_nip,
            "nazwa" => &self.nazwa,
            "typ" => &self.typ,
            "silos_id" => &self.silos_id,
            "wojewodztwo" => &self.wojewodztwo,
            "powiat" => &self.powiat,
            "gmina" => &self.gmina,
            "miejscowosc" => &self.miejscowosc,
            "kod_pocztowy" => &self.kod_pocztowy,
            "ulica" => &self.ulica,
            "nr_nieruchomosci" => &self.nr_nieruchomosci,
            "nr_lokalu" => &self.nr_lokalu,
            "data_zakonczenia_dzialalnosci" => &self.data_zakonczenia_dzialalnosci,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Detailed report of one entity.
///
/// Deliberately schema-less: the service defines a different field set per
/// report definition, so the full record is kept as returned, with the
/// report prefix stripped from every key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullReport(Record);

impl FullReport {
    pub fn new(fields: Record) -> Self {
        Self(fields)
    }

    /// Value of a field, if present and non-null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Option::as_deref)
    }

    /// Whether the field exists at all (even with a null value).
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for FullReport {
    fn from(fields: Record) -> Self {
        Self(fields)
    }
}

/// One PKD (activity classification) entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    pub kod: Option<String>,
    pub nazwa: Option<String>,
    /// Whether this is the entity's primary activity.
    pub przewazajace: Option<bool>,
}

/// Address derived from a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressView {
    pub ulica: Option<String>,
    pub nr_nieruchomosci: Option<String>,
    pub nr_lokalu: Option<String>,
    /// Street line: `"{ulica} {nr_nieruchomosci}/{nr_lokalu}"`.
    pub adres: Option<String>,
    pub kod_pocztowy: Option<String>,
    pub miejscowosc: Option<String>,
    pub gmina: Option<String>,
    pub powiat: Option<String>,
    pub wojewodztwo: Option<String>,
}

/// Contact details derived from a full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactView {
    pub nr_telefonu: Option<String>,
    pub nr_wewnetrzny_telefonu: Option<String>,
    pub nr_faksu: Option<String>,
    pub email: Option<String>,
    pub www: Option<String>,
}
