// handlers/mod.rs - HTTP handlers grouped by feature
//
// Handlers stay thin: decode the body, resolve the backend client with the
// route's access policy, call a service, shape the `{ "message": ... }`
// response. Routes are registered in `app.rs`.

pub mod auth;          // /auth/*, /password/*, legacy /changePassword and /signUp
pub mod files;         // /files/deleteFile
pub mod notifications; // /notifications/*
pub mod reports;       // /reportePDF/*

/*
ACCESS POLICIES:

| Handler group               | Policy              | Production credentials          |
|-----------------------------|---------------------|---------------------------------|
| change password, sign-up    | UserToken           | SUPABASE_URL + anon key + bearer |
| change email, files         | UserToken           | (change email also uses admin)  |
| custom email, reports       | UserToken           |                                 |
| notification sweeps         | ServiceOrUserToken  | SB_URL + SB_SERVICE_ROLE         |
| forgot/confirm/reset        | Admin               | SB_URL + SUPABASE_SERVICE_ROLE_KEY |

Development deployments, and any request with `"test": true`, run every
handler against SB_URL with SB_SERVICE_ROLE and skip the token check.
*/
