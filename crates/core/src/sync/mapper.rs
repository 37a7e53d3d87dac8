//! Lead to CRM record field mapping

use leadforge_domain::Lead;
use serde_json::{json, Value};

/// Company value used when the lead did not provide one; the CRM requires
/// the field.
const UNKNOWN_COMPANY: &str = "Unknown";

/// Map a lead onto the CRM's lead record schema.
///
/// The display name is split into first/last, the source tag becomes the
/// CRM's enumerated lead-source value, and the message is duplicated into
/// both the description and the requirements field.
#[must_use]
pub fn lead_to_crm_record(lead: &Lead) -> Value {
    let (first_name, last_name) = split_name(&lead.name);

    let mut record = json!({
        "Last_Name": last_name,
        "Email": lead.email,
        "Company": lead.company.as_deref().unwrap_or(UNKNOWN_COMPANY),
        "Lead_Source": lead.source.crm_label(),
        "Description": lead.message,
        "Requirements": lead.message,
    });

    if let Some(first) = first_name {
        record["First_Name"] = Value::String(first);
    }
    if let Some(phone) = &lead.phone {
        record["Phone"] = Value::String(phone.clone());
    }
    if let Some(product) = &lead.product_name {
        record["Product_Interest"] = Value::String(product.clone());
    }

    record
}

/// Split a display name into (first, last).
///
/// The final whitespace-separated token becomes the last name; a single
/// token maps entirely to the last name, which the CRM requires.
fn split_name(name: &str) -> (Option<String>, String) {
    let trimmed = name.trim();
    match trimmed.rsplit_once(char::is_whitespace) {
        Some((first, last)) => (Some(first.trim().to_string()), last.to_string()),
        None => (None, trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for sync::mapper.
    use leadforge_domain::{LeadInput, LeadSource};

    use super::*;

    fn sample_lead() -> Lead {
        Lead::from_input(LeadInput {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            company: Some("Acme Fabrication".to_string()),
            message: "Need a quote for a hydraulic press".to_string(),
            product_name: Some("HP-3000".to_string()),
            lead_source: LeadSource::Form,
        })
    }

    #[test]
    fn maps_all_fields() {
        let record = lead_to_crm_record(&sample_lead());

        assert_eq!(record["First_Name"], "Jane");
        assert_eq!(record["Last_Name"], "Doe");
        assert_eq!(record["Email"], "jane@example.com");
        assert_eq!(record["Phone"], "+1 555 0100");
        assert_eq!(record["Company"], "Acme Fabrication");
        assert_eq!(record["Lead_Source"], "Website Form");
        assert_eq!(record["Product_Interest"], "HP-3000");
    }

    #[test]
    fn message_is_duplicated_into_description_and_requirements() {
        let record = lead_to_crm_record(&sample_lead());
        assert_eq!(record["Description"], record["Requirements"]);
        assert_eq!(record["Description"], "Need a quote for a hydraulic press");
    }

    #[test]
    fn single_token_name_becomes_last_name() {
        let mut lead = sample_lead();
        lead.name = "Cher".to_string();

        let record = lead_to_crm_record(&lead);
        assert_eq!(record["Last_Name"], "Cher");
        assert!(record.get("First_Name").is_none());
    }

    #[test]
    fn multi_part_name_keeps_middle_names_in_first() {
        let mut lead = sample_lead();
        lead.name = "Ana Maria Souza".to_string();

        let record = lead_to_crm_record(&lead);
        assert_eq!(record["First_Name"], "Ana Maria");
        assert_eq!(record["Last_Name"], "Souza");
    }

    #[test]
    fn missing_company_falls_back_to_placeholder() {
        let mut lead = sample_lead();
        lead.company = None;
        lead.phone = None;
        lead.product_name = None;

        let record = lead_to_crm_record(&lead);
        assert_eq!(record["Company"], UNKNOWN_COMPANY);
        assert!(record.get("Phone").is_none());
        assert!(record.get("Product_Interest").is_none());
    }

    #[test]
    fn chat_source_maps_to_chat_label() {
        let mut lead = sample_lead();
        lead.source = LeadSource::ChatAgent;

        let record = lead_to_crm_record(&lead);
        assert_eq!(record["Lead_Source"], "Website Chat");
    }
}
