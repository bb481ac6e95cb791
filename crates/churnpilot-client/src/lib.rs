pub mod benefits;
pub mod commands;
pub mod contracts;
pub mod eligibility;
pub mod error;
pub mod library;
pub mod models;
pub mod portfolio;
pub mod preferences;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use library::catalog::CardLibrary;
pub use models::{Card, CardData, CardTemplate, Credit, CreditUsage, SignupBonus};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
