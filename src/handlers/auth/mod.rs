// handlers/auth/mod.rs - Account and password handlers
//
// Password changes, token-based and direct resets, user registration and
// email changes. Each handler resolves its backend client through
// `middleware::authorize` with the policy the flow needs.

pub mod account;  // POST /auth/signUp, PUT /auth/changeUserEmail
pub mod password; // PUT /auth/changePassword, POST /auth/forgotPassword, ...

pub use account::{change_user_email, sign_up};
pub use password::{change_password, confirm_forgot_password, forgot_password, reset_password};

/*
ACCOUNT FLOWS:

1. **Change password**: PUT /auth/changePassword
   - Signed-in user; re-authenticates with `old_password` first
2. **Forgot password**: POST /auth/forgotPassword
   - Stores a one-hour reset token on the user and mails a confirmation link
3. **Confirm reset**: POST /auth/confirmForgotPassword
   - Token must match the stored one and still verify; mails a provisional password
4. **Direct reset**: POST /password/forgotPassword
   - Older flow without the token round-trip
5. **Sign up**: POST /auth/signUp
   - Creates the auth user and the `users` row, mails the provisional password
6. **Change email**: PUT /auth/changeUserEmail
   - Auth server first (admin credentials), then the `users` row

Reset flows run without a caller identity, so they use service credentials.
*/
