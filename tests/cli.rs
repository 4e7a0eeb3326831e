use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::process::{Command, Output};

use gh_app_jwt::AppClaims;

const APP_KEY: &str = include_str!("fixtures/app_key.pem");
const APP_PUBLIC_KEY: &str = include_str!("fixtures/app_key.pub.pem");
const EC_KEY: &str = include_str!("fixtures/ec_key.pem");

const ENV_VARS: [&str; 5] = [
    "GH_APP_ID",
    "GH_APP_PRIVATE_KEY",
    "GH_APP_PRIVATE_KEY_PATH",
    "GH_APP_JWT_LIFETIME",
    "RUST_LOG",
];

fn run(envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gh-app-jwt"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.envs(envs.iter().copied())
        .args(args)
        .output()
        .expect("failed to spawn gh-app-jwt")
}

fn token_from(output: &Output) -> String {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {}", stdout);
    stdout
        .trim_end()
        .strip_prefix("jwt=")
        .expect("output should start with jwt=")
        .to_string()
}

fn verified_claims(token: &str) -> AppClaims {
    let key = DecodingKey::from_rsa_pem(APP_PUBLIC_KEY.as_bytes()).unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_required_spec_claims(&["exp", "iss"]);
    decode::<AppClaims>(token, &key, &validation)
        .expect("token should verify")
        .claims
}

#[test]
fn test_env_vars_produce_verifiable_token() {
    let output = run(&[("GH_APP_ID", "12345"), ("GH_APP_PRIVATE_KEY", APP_KEY)], &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let claims = verified_claims(&token_from(&output));
    assert_eq!(claims.iss, "12345");
    assert_eq!(claims.exp - claims.iat, 600);
}

#[test]
fn test_header_and_payload_shape() {
    let output = run(&[("GH_APP_ID", "12345"), ("GH_APP_PRIVATE_KEY", APP_KEY)], &[]);
    assert!(output.status.success());

    let token = token_from(&output);
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);

    let header: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
    assert_eq!(header["alg"], "RS256");

    let payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
    let fields = payload.as_object().unwrap();
    assert_eq!(fields.len(), 3);
    assert!(fields.contains_key("iat") && fields.contains_key("exp"));
    assert_eq!(payload["iss"], "12345");
}

#[test]
fn test_key_path_and_lifetime_flags() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("app.pem");
    std::fs::write(&key_path, APP_KEY).unwrap();

    let output = run(
        &[],
        &[
            "--app-id",
            "42",
            "--private-key-path",
            key_path.to_str().unwrap(),
            "--lifetime",
            "120",
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let claims = verified_claims(&token_from(&output));
    assert_eq!(claims.iss, "42");
    assert_eq!(claims.exp - claims.iat, 120);
}

#[test]
fn test_missing_app_id_fails_without_output() {
    let output = run(&[("GH_APP_PRIVATE_KEY", APP_KEY)], &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GH_APP_ID"), "stderr: {}", stderr);
}

#[test]
fn test_missing_private_key_fails_without_output() {
    let output = run(&[("GH_APP_ID", "12345")], &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration error"));
}

#[test]
fn test_non_pem_key_fails_without_output() {
    let output = run(
        &[("GH_APP_ID", "12345"), ("GH_APP_PRIVATE_KEY", "not-a-valid-key")],
        &[],
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration error"));
}

#[test]
fn test_wrong_key_type_fails_without_output() {
    let output = run(&[("GH_APP_ID", "12345"), ("GH_APP_PRIVATE_KEY", EC_KEY)], &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("signing error"));
}

#[test]
fn test_lifetime_above_maximum_is_rejected() {
    let output = run(
        &[
            ("GH_APP_ID", "12345"),
            ("GH_APP_PRIVATE_KEY", APP_KEY),
            ("GH_APP_JWT_LIFETIME", "601"),
        ],
        &[],
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_logs_stay_off_stdout() {
    let output = run(
        &[("GH_APP_ID", "12345"), ("GH_APP_PRIVATE_KEY", APP_KEY)],
        &["--log-level", "debug"],
    );
    assert!(output.status.success());
    token_from(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Minted GitHub App JWT"), "stderr: {}", stderr);
    assert!(!stderr.contains("BEGIN RSA PRIVATE KEY"));
}
