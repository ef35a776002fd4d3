use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, model::role::Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub user_id: u64,
    pub role: Role,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_token(
    user_id: u64,
    email: &str,
    role: Role,
    employee_id: Option<u64>,
    config: &Config,
) -> Result<String, Error> {
    let iat = now();
    let claims = Claims {
        sub: email.to_string(),
        user_id,
        role,
        employee_id,
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        iat,
        exp: iat + config.access_token_ttl,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &config.jwt_secret)
}

fn sign(claims: &Claims, secret: &str) -> Result<String, Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Checks signature, expiry, issuer and audience.
pub fn verify_token(token: &str, config: &Config) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);
    validation.set_audience(&[config.jwt_audience.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_and_keeps_identity() {
        let config = Config::for_tests();
        let token = generate_token(7, "jane@company.com", Role::Hr, Some(5), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "jane@company.com");
        assert_eq!(claims.role, Role::Hr);
        assert_eq!(claims.employee_id, Some(5));
        assert_eq!(claims.exp - claims.iat, config.access_token_ttl);
    }

    #[test]
    fn token_ids_are_unique() {
        let config = Config::for_tests();
        let a = verify_token(&generate_token(1, "a@b.co", Role::Admin, None, &config).unwrap(), &config).unwrap();
        let b = verify_token(&generate_token(1, "a@b.co", Role::Admin, None, &config).unwrap(), &config).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = Config::for_tests();
        let token = generate_token(1, "a@b.co", Role::Admin, None, &config).unwrap();

        let other = Config {
            jwt_secret: "another-secret".into(),
            ..config
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let config = Config::for_tests();
        let token = generate_token(1, "a@b.co", Role::Admin, None, &config).unwrap();

        let other = Config {
            jwt_audience: "someone-else".into(),
            ..config
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = Config::for_tests();
        let issued = now() - 7200;
        let claims = Claims {
            sub: "a@b.co".into(),
            user_id: 1,
            role: Role::Employee,
            employee_id: Some(3),
            iss: config.jwt_issuer.clone(),
            aud: config.jwt_audience.clone(),
            iat: issued,
            exp: issued + 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, &config.jwt_secret).unwrap();

        assert!(verify_token(&token, &config).is_err());
    }
}
