// Row types for the externally-owned schema.
//
// Timestamps stay as the strings PostgREST returns (`timestamptz`, `timestamp`
// and `date` columns all appear); `report::format` parses them on use.

pub mod client;
pub mod deadline;
pub mod ledger;
pub mod liquidation;
pub mod notification;
pub mod user;

pub use client::{Client, ClientCase, Company, Institution};
pub use deadline::{Activity, Habilitante, Tramite};
pub use ledger::{CajaChicaDetail, CajaChicaRegistro, CajaChicaSaldo, CajaChicaSoporte, RegFacturable};
pub use liquidation::{CajaChicaLiqClient, CajaChicaLiqInternal, InsertedRow, RegFacturableLiq};
pub use notification::NewPushNotification;
pub use user::{NewUser, User, UserSummary};
