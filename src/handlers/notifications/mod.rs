// handlers/notifications/mod.rs - Notification sweeps and ad-hoc email
//
// Sweeps are plain GETs so a scheduler can call them with the service-role
// key. Each returns 201 with a summary of what it sent.

pub mod custom_email; // POST /notifications/customEmail
pub mod sweep;        // GET /notifications/{kind}

pub use custom_email::custom_email;
pub use sweep::{actividades, caja_chica, factura, habilitantes, tramites};

/*
SWEEPS:

| Route          | Source table           | Channels      |
|----------------|------------------------|---------------|
| actividades    | actividades            | push          |
| tramites       | client_tramites        | push + email  |
| cajachica      | caja_chica_registros   | push + email  |
| factura        | reg_facturable         | push + email  |
| habilitantes   | habilitantes           | push          |

Deadline sweeps notify the day before, the same day and once overdue.
Ledger sweeps remind supervisors about records still unliquidated ten days
after their date. Flags on the source rows keep every reminder single-shot.
*/
