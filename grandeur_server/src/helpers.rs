use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

use crate::errors::ServerError;

/// Matches the storefront's email sanity check: something@something.tld, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    // Panic-free: the pattern is a compile-time constant
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map(|re| re.is_match(email)).unwrap_or(false)
}

const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&#";

/// Password policy: at least 8 characters with one uppercase letter, one lowercase letter, one digit and one special
/// character. Expressed as explicit checks because the lookahead regex used by the storefront has no equivalent in
/// the `regex` crate.
pub fn validate_password_strength(password: &str) -> Result<(), ServerError> {
    let long_enough = password.len() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    if long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(ServerError::InvalidRequest(format!(
            "Password must be at least 8 characters and include: 1 uppercase letter, 1 lowercase letter, 1 number, \
             and 1 special character ({PASSWORD_SPECIAL_CHARS})."
        )))
    }
}

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, use_x_forwarded_for: bool, use_forwarded: bool) -> Option<IpAddr> {
    let mut result = None;
    if use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result =
            req.headers().get("X-Forwarded-For").and_then(|v| v.to_str().ok()).and_then(|s| IpAddr::from_str(s).ok());
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        let re = Regex::new(r#"for=(?P<ip>[^;]+)"#).ok()?;
        result = req
            .headers()
            .get("Forwarded")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| re.captures(v))
            .and_then(|caps| caps.name("ip"))
            .map(|m| m.as_str())
            .and_then(|s| IpAddr::from_str(s).ok());
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.connection_info().peer_addr().map(|a| a.to_string());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr.and_then(|s| IpAddr::from_str(&s).ok())
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.ng"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("white space@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn password_policy() {
        assert!(validate_password_strength("Str0ng!pw").is_ok());
        assert!(validate_password_strength("weak").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1!").is_err());
        assert!(validate_password_strength("NoSpecials123").is_err());
    }
}
