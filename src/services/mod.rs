// Business workflows behind the HTTP handlers and the CLI.
//
// Services borrow a backend client resolved per request, the shared
// configuration and, where they send email, a mailer.

pub mod account_service;
pub mod liquidation_service;
pub mod notification_service;

pub use account_service::{required, AccountService, SignUpRequest};
pub use liquidation_service::{LiquidationRequest, LiquidationService};
pub use notification_service::{NotificationService, SweepKind, SweepSummary};
