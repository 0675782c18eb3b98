//! Deal enrichment: resolves a deal's contacts, companies and owner into a
//! single denormalised record.
//!
//! Association and owner reads are independent and run concurrently; the
//! batch reads run concurrently once the ids are known. An owner lookup
//! failure only blanks `owner_email`. Any other failure degrades the result
//! to the raw deal.

use crate::domain::model::{
    Association, CompanySummary, ContactSummary, CrmObject, Deal, DealRecord, EnrichedDeal,
    ObjectId,
};
use crate::domain::ports::{CrmClient, ObjectType};
use crate::utils::error::{PortalError, Result};
use std::collections::HashSet;

pub const CONTACT_PROPERTIES: [&str; 3] = ["email", "firstname", "lastname"];
pub const COMPANY_PROPERTIES: [&str; 4] = ["name", "domain", "hs_additional_domains", "website"];

/// Enriches one deal. Never fails: on error the deal comes back as
/// [`DealRecord::Unenriched`].
pub async fn enrich(deal: Deal, client: &dyn CrmClient) -> DealRecord {
    match resolve(&deal, client).await {
        Ok((owner_email, associated_contacts, associated_companies)) => {
            DealRecord::Enriched(EnrichedDeal {
                deal,
                owner_email,
                associated_contacts,
                associated_companies,
            })
        }
        Err(e) => {
            tracing::error!("❌ Enrichment failed for deal {}: {}", deal.id, e);
            DealRecord::Unenriched(deal)
        }
    }
}

async fn resolve(
    deal: &Deal,
    client: &dyn CrmClient,
) -> Result<(Option<String>, Vec<ContactSummary>, Vec<CompanySummary>)> {
    let (contact_links, company_links, owner_email) = tokio::join!(
        client.get_associations(ObjectType::Deals, &deal.id, ObjectType::Contacts),
        client.get_associations(ObjectType::Deals, &deal.id, ObjectType::Companies),
        resolve_owner_email(deal, client),
    );
    let contact_ids = target_ids(contact_links?);
    let company_ids = target_ids(company_links?);

    tracing::debug!(
        "Deal {}: {} contacts, {} companies",
        deal.id,
        contact_ids.len(),
        company_ids.len()
    );

    let (contacts, companies) = tokio::try_join!(
        read_batch(client, ObjectType::Contacts, &contact_ids, &CONTACT_PROPERTIES),
        read_batch(client, ObjectType::Companies, &company_ids, &COMPANY_PROPERTIES),
    )?;

    let contacts = contacts
        .iter()
        .map(summarize_contact)
        .collect::<Result<Vec<_>>>()?;
    let companies = companies
        .iter()
        .map(summarize_company)
        .collect::<Result<Vec<_>>>()?;

    Ok((owner_email, contacts, companies))
}

fn target_ids(associations: Vec<Association>) -> Vec<ObjectId> {
    associations.into_iter().map(|a| a.to_object_id).collect()
}

async fn read_batch(
    client: &dyn CrmClient,
    object_type: ObjectType,
    ids: &[ObjectId],
    properties: &[&str],
) -> Result<Vec<CrmObject>> {
    // 空的 id 清單不呼叫 API
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    client.batch_read(object_type, ids, properties).await
}

async fn resolve_owner_email(deal: &Deal, client: &dyn CrmClient) -> Option<String> {
    let owner_id = deal.owner_id()?;
    match client.get_owner(owner_id).await {
        Ok(owner) => owner.email.filter(|email| !email.is_empty()),
        Err(e) => {
            tracing::warn!("⚠️ Owner {} lookup failed for deal {}: {}", owner_id, deal.id, e);
            None
        }
    }
}

fn numeric_id(object: &CrmObject) -> Result<i64> {
    object.id.as_i64().ok_or_else(|| PortalError::ProcessingError {
        message: format!("non-numeric object id: {}", object.id),
    })
}

pub fn summarize_contact(contact: &CrmObject) -> Result<ContactSummary> {
    let email = contact.property("email");
    let first = contact.property("firstname").unwrap_or("");
    let last = contact.property("lastname").unwrap_or("");

    Ok(ContactSummary {
        contact_id: numeric_id(contact)?,
        contact_email_addresses: email.map(|e| vec![e.to_string()]).unwrap_or_default(),
        contact_name: format!("{} {}", first, last).trim().to_string(),
    })
}

pub fn summarize_company(company: &CrmObject) -> Result<CompanySummary> {
    Ok(CompanySummary {
        company_id: numeric_id(company)?,
        company_name: company.property("name").unwrap_or("").to_string(),
        company_domains: merge_domains(
            company.property("domain"),
            company.property("website"),
            company.property("hs_additional_domains"),
        ),
    })
}

/// Union of the primary domain, the website and the `;`-separated
/// additional domains, in that order, without blanks or repeats.
pub fn merge_domains(
    primary: Option<&str>,
    website: Option<&str>,
    additional: Option<&str>,
) -> Vec<String> {
    let candidates = primary
        .into_iter()
        .chain(website)
        .chain(additional.into_iter().flat_map(|list| list.split(';')))
        .map(str::trim)
        .filter(|domain| !domain.is_empty());

    let mut seen = HashSet::new();
    candidates
        .filter(|domain| seen.insert(*domain))
        .map(str::to_string)
        .collect()
}
