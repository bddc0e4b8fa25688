//! Input validation for the download prompt.
//!
//! Every line typed at the prompt (other than `exit`) is a URL candidate.
//! Only absolute `http`/`https` URLs are accepted; see [`is_valid_http_url`].

mod url;

pub use url::is_valid_http_url;
