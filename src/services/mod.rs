// Service exports
pub mod bureau;
pub mod salesforce;

pub use bureau::{BureauGateway, BureauError};
pub use salesforce::{SalesforceClient, SalesforceCredentials, SalesforceError};
