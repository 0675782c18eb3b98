use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// HubSpot ids arrive as JSON strings from the object APIs and as numbers
/// from the association and CMS APIs; both normalise to the decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct ObjectId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for ObjectId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => ObjectId(n.to_string()),
            RawId::Text(s) => ObjectId(s),
        }
    }
}

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// HubSpot property values are strings or null.
pub type Properties = BTreeMap<String, Option<String>>;

fn non_empty<'a>(properties: &'a Properties, name: &str) -> Option<&'a str> {
    properties
        .get(name)
        .and_then(|v| v.as_deref())
        .filter(|v| !v.is_empty())
}

/// A deal as returned by the CRM objects API. Fields we do not model
/// (`createdAt`, `archived`, ...) ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: ObjectId,
    #[serde(default)]
    pub properties: Properties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Deal {
    pub const OWNER_PROPERTY: &'static str = "hubspot_owner_id";

    pub fn owner_id(&self) -> Option<&str> {
        non_empty(&self.properties, Self::OWNER_PROPERTY)
    }
}

/// One row of a v4 association listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Association {
    #[serde(rename = "toObjectId")]
    pub to_object_id: ObjectId,
}

/// Generic CRM object from a batch read (contacts, companies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmObject {
    pub id: ObjectId,
    #[serde(default)]
    pub properties: Properties,
}

impl CrmObject {
    pub fn property(&self, name: &str) -> Option<&str> {
        non_empty(&self.properties, name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Owner {
    pub id: ObjectId,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub contact_id: i64,
    pub contact_email_addresses: Vec<String>,
    pub contact_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_id: i64,
    pub company_name: String,
    pub company_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedDeal {
    #[serde(flatten)]
    pub deal: Deal,
    pub owner_email: Option<String>,
    #[serde(rename = "associatedContacts")]
    pub associated_contacts: Vec<ContactSummary>,
    #[serde(rename = "associatedCompanies")]
    pub associated_companies: Vec<CompanySummary>,
}

/// Output of the enrichment pipeline. A record without the association keys
/// means enrichment failed and the raw deal was passed through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DealRecord {
    Enriched(EnrichedDeal),
    Unenriched(Deal),
}

impl DealRecord {
    pub fn deal(&self) -> &Deal {
        match self {
            DealRecord::Enriched(enriched) => &enriched.deal,
            DealRecord::Unenriched(deal) => deal,
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, DealRecord::Enriched(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "postBody", default, skip_serializing_if = "Option::is_none")]
    pub post_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<ObjectId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlogPost {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// String-valued passthrough field such as `url` or `featuredImage`.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: ObjectId,
    pub name: String,
}

/// Envelope shared by the HubSpot listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
