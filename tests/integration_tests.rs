// Integration tests for the credit pull pipeline against mocked
// Salesforce and bureau gateway endpoints

use credit_pull::core::CreditPullPipeline;
use credit_pull::models::{BureauHeader, PullOutcome};
use credit_pull::services::{BureauGateway, SalesforceClient, SalesforceCredentials, SalesforceError};
use credit_pull::core::PipelineError;
use mockito::{Matcher, Mock, ServerGuard};
use std::sync::Arc;

const RECORD_ID: &str = "006Ro00000K1fC5";
const CONTACT_ID: &str = "003Ro00000AbCdE";

fn build_pipeline(server_url: &str) -> CreditPullPipeline {
    let salesforce = Arc::new(SalesforceClient::new(
        server_url.to_string(),
        "v62.0".to_string(),
        "Opportunity".to_string(),
        SalesforceCredentials {
            client_id: "key".to_string(),
            client_secret: "secret".to_string(),
            username: "user@example.com".to_string(),
            password: "pass".to_string(),
        },
    ));

    let bureau = Arc::new(BureauGateway::new(format!("{}/bureau", server_url)));

    let header = BureauHeader {
        user_id: "bureau_user".to_string(),
        user_password: "bureau_pass".to_string(),
        customer_id: "cus123".to_string(),
    };

    CreditPullPipeline::new(salesforce, bureau, header)
}

async fn mock_salesforce_reads(server: &mut ServerGuard) -> (Mock, Mock, Mock) {
    let token = server
        .mock("POST", "/services/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "test-token"}"#)
        .create_async()
        .await;

    let opportunity = server
        .mock(
            "GET",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"Id": "{}", "ContactId": "{}"}}"#, RECORD_ID, CONTACT_ID))
        .create_async()
        .await;

    let contact = server
        .mock(
            "GET",
            format!("/services/data/v62.0/sobjects/Contact/{}", CONTACT_ID).as_str(),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "FirstName": "Jane",
                "LastName": "Smith",
                "SSN__c": "123-45-6789",
                "MailingStreet": "1 Main St",
                "MailingCity": "Springfield",
                "MailingStateCode": "IL",
                "MailingPostalCode": "62701"
            }"#,
        )
        .create_async()
        .await;

    (token, opportunity, contact)
}

fn scored_bureau_xml() -> &'static str {
    "<XML_INTERFACE><ERROR_DESCRIPT></ERROR_DESCRIPT><CREDITREPORT><BUREAU_TYPE>\
     <NOHIT>False</NOHIT>\
     <SCORES><SCORE>720</SCORE></SCORES>\
     <CC_ATTRIB><CCSUMMARY>\
     <TOTALREVOLVINGBAL>1500</TOTALREVOLVINGBAL>\
     <AVAILABLEPERCENTAGE>85</AVAILABLEPERCENTAGE>\
     <CURRENT>7</CURRENT>\
     <TOTALINSTALLMENTBAL>12000</TOTALINSTALLMENTBAL>\
     <TOTALREALESTATEBAL>250000</TOTALREALESTATEBAL>\
     <LAST_6MINQUIRIES>2</LAST_6MINQUIRIES>\
     <PASTDUE>N</PASTDUE>\
     <AMOUNTPASTDUE>0</AMOUNTPASTDUE>\
     </CCSUMMARY></CC_ATTRIB>\
     </BUREAU_TYPE><REPORT>&lt;html&gt;&lt;body&gt;Credit report body&lt;/body&gt;&lt;/html&gt;</REPORT></CREDITREPORT></XML_INTERFACE>"
}

#[tokio::test]
async fn test_scored_pull_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let (token, opportunity, contact) = mock_salesforce_reads(&mut server).await;

    let bureau = server
        .mock("POST", "/bureau")
        .match_header("content-type", "text/xml; charset=utf-8")
        // The request must carry the normalized SSN.
        .match_body(Matcher::Regex("<social>123456789</social>".to_string()))
        .with_status(200)
        .with_body(scored_bureau_xml())
        .create_async()
        .await;

    let upload = server
        .mock("POST", "/services/data/v62.0/sobjects/ContentVersion/")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "Title": "Jane Smith - 720 - Experian Credit Report",
            "PathOnClient": "credit_report.pdf",
            "FirstPublishLocationId": RECORD_ID,
        })))
        .with_status(201)
        .with_body(r#"{"id": "068xx0000000001", "success": true}"#)
        .create_async()
        .await;

    let patch = server
        .mock(
            "PATCH",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .match_body(Matcher::PartialJson(serde_json::json!({
            "FICO__c": "720",
            "Total_Revolving_Balance__c": "1500",
            "Revolving_Available__c": "85",
            "Open_Tradelines__c": "7",
            "Total_Installment_Balance__c": "12000",
            "Real_Estate_Balance__c": "250000",
            "Inquires_in_Last_6_Mos__c": "2",
            "Past_Due_Accounts__c": "N",
            "Amount_Past_Due__c": "0",
        })))
        .with_status(204)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    match outcome {
        PullOutcome::Scored { score, report_markup, write_back } => {
            assert_eq!(score, "720");
            assert_eq!(report_markup, "<html><body>Credit report body</body></html>");
            assert!(write_back.fully_succeeded());
        }
        other => panic!("expected Scored, got {:?}", other),
    }

    token.assert_async().await;
    opportunity.assert_async().await;
    contact.assert_async().await;
    bureau.assert_async().await;
    upload.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_no_hit_skips_render_and_write_back() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_salesforce_reads(&mut server).await;

    let _bureau = server
        .mock("POST", "/bureau")
        .with_status(200)
        .with_body(
            "<XML_INTERFACE><CREDITREPORT><BUREAU_TYPE><NOHIT>True</NOHIT></BUREAU_TYPE></CREDITREPORT></XML_INTERFACE>",
        )
        .create_async()
        .await;

    let upload = server
        .mock("POST", "/services/data/v62.0/sobjects/ContentVersion/")
        .expect(0)
        .create_async()
        .await;

    let patch = server
        .mock(
            "PATCH",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    assert!(matches!(outcome, PullOutcome::NoHit));

    upload.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_bureau_error_is_returned_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_salesforce_reads(&mut server).await;

    let _bureau = server
        .mock("POST", "/bureau")
        .with_status(200)
        .with_body(
            "<XML_INTERFACE><ERROR_DESCRIPT>Invalid user credentials</ERROR_DESCRIPT></XML_INTERFACE>",
        )
        .create_async()
        .await;

    let patch = server
        .mock(
            "PATCH",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    match outcome {
        PullOutcome::BureauError { description } => {
            assert_eq!(description, "Invalid user credentials")
        }
        other => panic!("expected BureauError, got {:?}", other),
    }

    patch.assert_async().await;
}

#[tokio::test]
async fn test_thin_file_decline_skips_write_back() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_salesforce_reads(&mut server).await;

    let _bureau = server
        .mock("POST", "/bureau")
        .with_status(200)
        .with_body(
            "<XML_INTERFACE><CREDITREPORT><BUREAU_TYPE>\
             <NOHIT>False</NOHIT>\
             <CC_ATTRIB><CCMESSAGES><ITEM_MESSAGE><DESCRIPTION>Thin file</DESCRIPTION></ITEM_MESSAGE></CCMESSAGES></CC_ATTRIB>\
             </BUREAU_TYPE></CREDITREPORT></XML_INTERFACE>",
        )
        .create_async()
        .await;

    let patch = server
        .mock(
            "PATCH",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    match outcome {
        PullOutcome::Declined { description } => assert_eq!(description, "Thin file"),
        other => panic!("expected Declined, got {:?}", other),
    }

    patch.assert_async().await;
}

#[tokio::test]
async fn test_auth_failure_ends_the_run() {
    let mut server = mockito::Server::new_async().await;

    let _token = server
        .mock("POST", "/services/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let opportunity = server
        .mock(
            "GET",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let err = pipeline.run(RECORD_ID).await.expect_err("auth failure must abort");

    match err {
        PipelineError::Salesforce(SalesforceError::Auth { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected Auth error, got {:?}", other),
    }

    opportunity.assert_async().await;
}

#[tokio::test]
async fn test_fetch_failure_ends_the_run() {
    let mut server = mockito::Server::new_async().await;

    let _token = server
        .mock("POST", "/services/oauth2/token")
        .with_status(200)
        .with_body(r#"{"access_token": "test-token"}"#)
        .create_async()
        .await;

    let _opportunity = server
        .mock(
            "GET",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .with_status(404)
        .with_body(r#"[{"errorCode": "NOT_FOUND"}]"#)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let err = pipeline.run(RECORD_ID).await.expect_err("fetch failure must abort");

    assert!(matches!(
        err,
        PipelineError::Salesforce(SalesforceError::Fetch { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_partial_write_back_is_reported_not_rolled_back() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_salesforce_reads(&mut server).await;

    let _bureau = server
        .mock("POST", "/bureau")
        .with_status(200)
        .with_body(scored_bureau_xml())
        .create_async()
        .await;

    // Upload fails, patch succeeds; neither undoes the other.
    let upload = server
        .mock("POST", "/services/data/v62.0/sobjects/ContentVersion/")
        .with_status(500)
        .with_body("storage unavailable")
        .create_async()
        .await;

    let patch = server
        .mock(
            "PATCH",
            format!("/services/data/v62.0/sobjects/Opportunity/{}", RECORD_ID).as_str(),
        )
        .with_status(204)
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    match outcome {
        PullOutcome::Scored { write_back, .. } => {
            assert!(write_back.attachment_error.is_some());
            assert!(write_back.patch_error.is_none());
            assert!(!write_back.fully_succeeded());
        }
        other => panic!("expected Scored, got {:?}", other),
    }

    upload.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_non_200_bureau_status_is_still_classified() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_salesforce_reads(&mut server).await;

    // The gateway may return structured error XML on non-200 statuses;
    // classification, not the status line, decides the outcome.
    let _bureau = server
        .mock("POST", "/bureau")
        .with_status(500)
        .with_body(
            "<XML_INTERFACE><ERROR_DESCRIPT>Backend offline</ERROR_DESCRIPT></XML_INTERFACE>",
        )
        .create_async()
        .await;

    let pipeline = build_pipeline(&server.url());
    let outcome = pipeline.run(RECORD_ID).await.expect("pipeline should succeed");

    match outcome {
        PullOutcome::BureauError { description } => assert_eq!(description, "Backend offline"),
        other => panic!("expected BureauError, got {:?}", other),
    }
}
