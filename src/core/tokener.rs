use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Claims carried by an auth token.
pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
}

/// Seam between the auth flow and the concrete token format.
pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
