use schoolhub::schoolhub_auth::{Role, create_access_token, verify_token};
use schoolhub::schoolhub_config::JwtConfig;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();
    let result = create_access_token(Uuid::new_v4(), "somsak", Role::Staff, &jwt_config);

    assert!(result.is_ok());
    assert!(!result.unwrap().is_empty());
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in Role::ALL {
        let token = create_access_token(user_id, "somsak", role, &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "somsak", Role::Teacher, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.username, "somsak");
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.user_id(), Some(user_id));
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(Uuid::new_v4(), "somsak", Role::Admin, &jwt_config).unwrap();

    let other = JwtConfig {
        secret: "another_secret".to_string(),
        access_token_expiry: 3600,
    };
    let err = verify_token(&token, &other).unwrap_err();
    assert_eq!(err.status.as_u16(), 401);
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    assert!(verify_token("not.a.token", &jwt_config).is_err());
    assert!(verify_token("", &jwt_config).is_err());
}
