use crate::models::{ApplicantProfile, BureauHeader};

/// Strip every non-digit character from an SSN.
///
/// The bureau schema wants bare digits; Salesforce stores the value with
/// hyphens. No length or format validation happens here — the bureau is
/// the authority on rejecting malformed input.
pub fn normalize_ssn(ssn: &str) -> String {
    ssn.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Escape a value for placement inside an XML element.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the bureau request document for a single primary applicant.
///
/// Pure transformation: the schema is positional, so every element is
/// always emitted even when its value is blank. The header constants
/// (`single_joint`, `pre_qual`, `action`) select a single-applicant
/// Experian pre-qualification pull.
pub fn build_request(profile: &ApplicantProfile, header: &BureauHeader) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<data_area>
    <header_data>
        <user_id>{user_id}</user_id>
        <user_pwd>{user_pwd}</user_pwd>
        <cus_id>{cus_id}</cus_id>
        <single_joint>0</single_joint>
        <pre_qual>1</pre_qual>
        <action>XPN</action>
    </header_data>
    <applicant_data>
        <applicant type="primary">
            <person_name>
                <first_name>{first_name}</first_name>
                <last_name>{last_name}</last_name>
            </person_name>
            <address_data>
                <address type="current">
                    <line_one>{street}</line_one>
                    <city>{city}</city>
                    <state_or_province>{state}</state_or_province>
                    <postal_code>{postal_code}</postal_code>
                </address>
            </address_data>
            <social>{ssn}</social>
        </applicant>
    </applicant_data>
</data_area>"#,
        user_id = escape_xml(&header.user_id),
        user_pwd = escape_xml(&header.user_password),
        cus_id = escape_xml(&header.customer_id),
        first_name = escape_xml(&profile.first_name),
        last_name = escape_xml(&profile.last_name),
        street = escape_xml(&profile.street),
        city = escape_xml(&profile.city),
        state = escape_xml(&profile.state),
        postal_code = escape_xml(&profile.postal_code),
        ssn = escape_xml(&normalize_ssn(&profile.ssn)),
    )
}
