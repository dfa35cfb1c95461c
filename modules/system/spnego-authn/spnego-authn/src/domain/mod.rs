//! Domain layer for the SPNEGO `AuthN` module.

pub mod account_status;
pub mod group_extractor;
pub mod local_client;
pub mod realm_check;
pub mod service;

pub use account_status::DefaultAccountStatusChecker;
pub use group_extractor::LogonInfoRoleExtractor;
pub use local_client::SpnegoAuthNLocalClient;
pub use realm_check::RealmAllowList;
pub use service::{Service, ServiceBuilder};
