pub mod otps;
pub mod refresh_tokens;
pub mod users;
