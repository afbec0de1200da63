use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::{AttachmentId, CategoryId, QuoteGroup, SlotFill};
use crate::errors::DomainError;

/// Currency applied when the ticket carries none.
pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePayload {
    pub quote_number: u8,
    pub price: Decimal,
    pub currency: String,
    pub attachment: AttachmentId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteGroupPayload {
    pub quote_request_category: CategoryId,
    pub quotes: Vec<QuotePayload>,
}

/// Body of the single atomic submission POST.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQuotesRequest {
    pub quote_group: Vec<QuoteGroupPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Upload results keyed by (group index, slot index) within the session.
pub type UploadedAttachments = BTreeMap<(usize, usize), AttachmentId>;

/// Assemble the nested submission body. Every group contributes an entry
/// even with zero valid quotes; only slots that are complete and have an
/// uploaded attachment id become quote entries.
pub fn assemble(
    groups: &[QuoteGroup],
    uploads: &UploadedAttachments,
    currency: Option<&str>,
    comment: &str,
) -> Result<SubmitQuotesRequest, DomainError> {
    let currency = currency.filter(|value| !value.trim().is_empty()).unwrap_or(DEFAULT_CURRENCY);

    let mut quote_group = Vec::with_capacity(groups.len());
    for (group_index, group) in groups.iter().enumerate() {
        let mut quotes = Vec::new();
        for (slot_index, slot) in group.slots.iter().enumerate() {
            match slot.fill() {
                SlotFill::Empty => continue,
                SlotFill::Partial => {
                    return Err(DomainError::InvariantViolation(format!(
                        "quote {} in `{}` is half-filled and cannot be assembled",
                        slot.quote_number, group.group_name
                    )));
                }
                SlotFill::Complete => {
                    let price = slot.parsed_price()?;
                    let attachment =
                        uploads.get(&(group_index, slot_index)).copied().ok_or_else(|| {
                            DomainError::InvariantViolation(format!(
                                "no uploaded attachment recorded for quote {} in `{}`",
                                slot.quote_number, group.group_name
                            ))
                        })?;
                    quotes.push(QuotePayload {
                        quote_number: slot.quote_number,
                        price,
                        currency: currency.to_owned(),
                        attachment,
                    });
                }
            }
        }
        quote_group.push(QuoteGroupPayload { quote_request_category: group.group_id, quotes });
    }

    let comment = Some(comment.trim().to_owned()).filter(|value| !value.is_empty());
    Ok(SubmitQuotesRequest { quote_group, comment })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use serde_json::json;

    use super::{assemble, UploadedAttachments};
    use crate::domain::quote::{
        AttachmentId, CategoryId, FileRef, QuoteCategory, QuoteGroup,
    };
    use crate::errors::DomainError;

    fn group(id: i64, name: &str) -> QuoteGroup {
        QuoteGroup::seeded(&QuoteCategory { id: CategoryId(id), name: name.to_string() })
    }

    fn document() -> FileRef {
        FileRef {
            name: "estimate.pdf".to_string(),
            path: PathBuf::from("/tmp/estimate.pdf"),
            mime: "application/pdf".to_string(),
        }
    }

    #[test]
    fn single_filled_slot_produces_the_expected_wire_body() {
        let mut plumbing = group(4, "Plumbing");
        plumbing.slots[0].price = "500".to_string();
        plumbing.slots[0].document = Some(document());

        let mut uploads: UploadedAttachments = BTreeMap::new();
        uploads.insert((0, 0), AttachmentId(9001));

        let request = assemble(&[plumbing], &uploads, None, "").expect("assemble");
        let body = serde_json::to_value(&request).expect("serialize");

        assert_eq!(
            body,
            json!({
                "quote_group": [{
                    "quote_request_category": 4,
                    "quotes": [{
                        "quote_number": 1,
                        "price": "500",
                        "currency": "INR",
                        "attachment": 9001
                    }]
                }]
            })
        );
    }

    #[test]
    fn groups_without_valid_quotes_still_appear_with_empty_arrays() {
        let groups = vec![group(1, "Plumbing"), group(2, "Electrical"), group(3, "Carpentry")];

        let request = assemble(&groups, &BTreeMap::new(), Some("USD"), "").expect("assemble");

        assert_eq!(request.quote_group.len(), 3);
        assert!(request.quote_group.iter().all(|entry| entry.quotes.is_empty()));
        assert_eq!(request.quote_group[2].quote_request_category, CategoryId(3));
    }

    #[test]
    fn ticket_currency_overrides_the_fallback() {
        let mut electrical = group(2, "Electrical");
        electrical.slots[2].price = "1250.50".to_string();
        electrical.slots[2].document = Some(document());

        let mut uploads: UploadedAttachments = BTreeMap::new();
        uploads.insert((0, 2), AttachmentId(77));

        let request = assemble(&[electrical], &uploads, Some("USD"), "").expect("assemble");
        assert_eq!(request.quote_group[0].quotes[0].currency, "USD");
        assert_eq!(request.quote_group[0].quotes[0].quote_number, 3);
    }

    #[test]
    fn complete_slot_without_an_upload_id_is_an_invariant_breach() {
        let mut plumbing = group(4, "Plumbing");
        plumbing.slots[0].price = "500".to_string();
        plumbing.slots[0].document = Some(document());

        let error = assemble(&[plumbing], &BTreeMap::new(), None, "")
            .expect_err("missing upload id must fail");
        assert!(matches!(error, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn unparseable_price_refuses_assembly() {
        let mut plumbing = group(4, "Plumbing");
        plumbing.slots[1].price = "about 500".to_string();
        plumbing.slots[1].document = Some(document());

        let mut uploads: UploadedAttachments = BTreeMap::new();
        uploads.insert((0, 1), AttachmentId(5));

        let error = assemble(&[plumbing], &uploads, None, "").expect_err("bad price");
        assert!(matches!(error, DomainError::InvalidPrice { quote_number: 2, .. }));
    }

    #[test]
    fn blank_comment_is_omitted_from_the_body() {
        let groups = vec![group(1, "Plumbing")];

        let without = assemble(&groups, &BTreeMap::new(), None, "   ").expect("assemble");
        assert_eq!(without.comment, None);
        let body = serde_json::to_value(&without).expect("serialize");
        assert!(body.get("comment").is_none());

        let with = assemble(&groups, &BTreeMap::new(), None, "gate code 4411").expect("assemble");
        assert_eq!(with.comment.as_deref(), Some("gate code 4411"));
    }
}
