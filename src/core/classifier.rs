use crate::models::{BureauOutcome, ScoredReport};
use roxmltree::{Document, Node};
use thiserror::Error;

/// Errors for bureau XML that cannot be interpreted at all
///
/// Everything else the gateway can say — error payloads, no-hits,
/// declines — is an outcome variant, not an error.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Malformed bureau XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("Bureau response missing {0} element")]
    MissingEnvelope(&'static str),
}

const NO_HIT_MARKER: &str = "True";

/// Walk a path of child element names from a starting node.
fn descend<'a, 'input>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    let mut current = node;
    for name in path {
        current = current
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == *name)?;
    }
    Some(current)
}

/// Text content of the element at `path`, trimmed; `None` if absent.
fn text_at<'a>(node: Node<'a, '_>, path: &[&str]) -> Option<String> {
    descend(node, path).map(|n| n.text().unwrap_or("").trim().to_string())
}

/// Classify a raw bureau response into exactly one outcome.
///
/// Ordered decision procedure over `XML_INTERFACE/CREDITREPORT/BUREAU_TYPE`:
/// 1. non-empty top-level `ERROR_DESCRIPT` wins,
/// 2. then the `NOHIT` marker,
/// 3. then a missing `SCORES/SCORE` reads the decline message,
/// 4. otherwise the response is scored.
///
/// The gateway encodes failure in the payload rather than the HTTP status,
/// so the caller must not pre-filter on status before classifying.
pub fn classify(raw_xml: &str) -> Result<BureauOutcome, ClassifyError> {
    let doc = Document::parse(raw_xml)?;
    let root = doc.root_element();

    if let Some(description) = text_at(root, &["ERROR_DESCRIPT"]) {
        if !description.is_empty() {
            return Ok(BureauOutcome::Error { description });
        }
    }

    let report = descend(root, &["CREDITREPORT"])
        .ok_or(ClassifyError::MissingEnvelope("CREDITREPORT"))?;
    let bureau = descend(report, &["BUREAU_TYPE"])
        .ok_or(ClassifyError::MissingEnvelope("BUREAU_TYPE"))?;

    if text_at(bureau, &["NOHIT"]).as_deref() == Some(NO_HIT_MARKER) {
        return Ok(BureauOutcome::NoHit);
    }

    let score = match text_at(bureau, &["SCORES", "SCORE"]) {
        Some(score) => score,
        None => {
            let description = text_at(
                bureau,
                &["CC_ATTRIB", "CCMESSAGES", "ITEM_MESSAGE", "DESCRIPTION"],
            )
            .unwrap_or_default();
            return Ok(BureauOutcome::Declined { description });
        }
    };

    let summary = |field: &str| -> String {
        text_at(bureau, &["CC_ATTRIB", "CCSUMMARY", field]).unwrap_or_default()
    };

    Ok(BureauOutcome::Scored(ScoredReport {
        score,
        cc_balance: summary("TOTALREVOLVINGBAL"),
        rev_avail_pct: summary("AVAILABLEPERCENTAGE"),
        open_trades: summary("CURRENT"),
        install_balance: summary("TOTALINSTALLMENTBAL"),
        real_estate_balance: summary("TOTALREALESTATEBAL"),
        six_mo_inquiries: summary("LAST_6MINQUIRIES"),
        past_due_flag: summary("PASTDUE"),
        amount_past_due: summary("AMOUNTPASTDUE"),
        report_markup: text_at(report, &["REPORT"]).unwrap_or_default(),
    }))
}
