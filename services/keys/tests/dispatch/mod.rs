// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use http::{Method, StatusCode};
use keyvault_crypto_core::hash::{base64url_decode, base64url_encode};
use keyvault_crypto_core::ErrorKind;
use keyvault_crypto_keys::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn config() -> Config {
    Config::default()
}

fn force_remote() -> Config {
    Config {
        force_remote: true,
        ..Default::default()
    }
}

fn token() -> StaticCredentialProvider {
    StaticCredentialProvider::new("token")
}

fn from_key(mock: &MockHttpSend, key: JsonWebKey) -> CryptographyClient {
    CryptographyClient::from_key(vault_key(key), mock.context(), token(), config()).unwrap()
}

#[tokio::test]
async fn test_local_round_trips_make_no_calls() -> anyhow::Result<()> {
    let mock = MockHttpSend::default();
    let client = from_key(&mock, rsa_key(KEY_A, &all_operations()));

    for alg in [
        EncryptionAlgorithm::Rsa15,
        EncryptionAlgorithm::RsaOaep,
        EncryptionAlgorithm::RsaOaep256,
    ] {
        let encrypted = client
            .encrypt(EncryptParameters::new(alg, b"plaintext".to_vec()))
            .await?;
        assert_eq!(encrypted.key_id, KEY_ID);
        assert_eq!(encrypted.algorithm, alg);

        let decrypted = client
            .decrypt(DecryptParameters::new(encrypted.algorithm, encrypted.ciphertext))
            .await?;
        assert_eq!(decrypted.plaintext, b"plaintext");
    }

    for alg in [
        KeyWrapAlgorithm::Rsa15,
        KeyWrapAlgorithm::RsaOaep,
        KeyWrapAlgorithm::RsaOaep256,
    ] {
        let raw_key = [0x11u8; 32];
        let wrapped = client.wrap_key(alg, &raw_key).await?;
        let unwrapped = client.unwrap_key(alg, &wrapped.encrypted_key).await?;
        assert_eq!(unwrapped.key, raw_key);
        assert_eq!(unwrapped.algorithm, alg);
    }

    for alg in [
        SignatureAlgorithm::Rs256,
        SignatureAlgorithm::Rs384,
        SignatureAlgorithm::Rs512,
        SignatureAlgorithm::Ps256,
        SignatureAlgorithm::Ps384,
        SignatureAlgorithm::Ps512,
    ] {
        let digest = alg.hash_algorithm().digest(b"payload");
        let signed = client.sign(alg, &digest).await?;
        assert!(client.verify(alg, &digest, &signed.signature).await?.is_valid);

        let other = alg.hash_algorithm().digest(b"other payload");
        assert!(!client.verify(alg, &other, &signed.signature).await?.is_valid);
    }

    assert_eq!(mock.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_signature_from_other_key_is_invalid() -> anyhow::Result<()> {
    let mock = MockHttpSend::default();
    let signer = from_key(&mock, rsa_key(KEY_A, &all_operations()));
    let verifier = from_key(&mock, public_only(rsa_key(KEY_B, &all_operations())));

    let signed = signer.sign_data(SignatureAlgorithm::Rs256, b"payload").await?;
    let verified = verifier
        .verify_data(SignatureAlgorithm::Rs256, b"payload", &signed.signature)
        .await?;
    assert!(!verified.is_valid);
    assert_eq!(mock.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_operation_not_permitted_goes_remote() -> anyhow::Result<()> {
    let signature = vec![0xab; 256];
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(&signature)}).to_string(),
    );
    let client = from_key(&mock, rsa_key(KEY_A, &[KeyOperation::Encrypt]));

    let digest = SignatureAlgorithm::Rs256.hash_algorithm().digest(b"payload");
    let signed = client.sign(SignatureAlgorithm::Rs256, &digest).await?;
    assert_eq!(signed.signature, signature);
    assert_eq!(signed.key_id, KEY_ID);
    assert_eq!(signed.algorithm, SignatureAlgorithm::Rs256);

    assert_eq!(mock.calls(), 1);
    let req = &mock.requests()[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri, format!("{KEY_ID}/sign?api-version=7.5"));
    assert_eq!(req.authorization.as_deref(), Some("Bearer token"));
    assert_eq!(
        req.json(),
        json!({"alg": "RS256", "value": base64url_encode(&digest)})
    );

    // Encrypt is permitted and stays local.
    client
        .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep, b"data".to_vec()))
        .await?;
    assert_eq!(mock.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_algorithm_is_rejected_before_any_call() {
    let mock = MockHttpSend::default();
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), force_remote()).unwrap();

    let err = EncryptParameters::parse("", b"data".to_vec()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = "".parse::<SignatureAlgorithm>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = "".parse::<KeyWrapAlgorithm>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(client.key_id(), KEY_ID);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_remote_decrypt_stamps_requested_algorithm() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        r#"{"kid":"https://vault/keys/k/v","value":"aGVsbG8"}"#,
    );
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), force_remote())?;

    let decrypted = client
        .decrypt(DecryptParameters::new(EncryptionAlgorithm::RsaOaep256, vec![1, 2, 3]))
        .await?;
    assert_eq!(decrypted.key_id, "https://vault/keys/k/v");
    assert_eq!(decrypted.plaintext, b"hello");
    assert_eq!(decrypted.algorithm, EncryptionAlgorithm::RsaOaep256);

    assert_eq!(mock.calls(), 1);
    let req = &mock.requests()[0];
    assert_eq!(req.uri, format!("{KEY_ID}/decrypt?api-version=7.5"));
    assert_eq!(req.json(), json!({"alg": "RSA-OAEP-256", "value": "AQID"}));
    Ok(())
}

#[tokio::test]
async fn test_remote_verify_uses_client_key_id() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(StatusCode::OK, r#"{"value":true}"#);
    let client = CryptographyClient::new(
        "https://vault.example.net/keys/k/v",
        mock.context(),
        token(),
        force_remote(),
    )?;

    let verified = client
        .verify(SignatureAlgorithm::Es256, &[0; 32], &[1; 64])
        .await?;
    assert_eq!(verified.key_id, "https://vault.example.net/keys/k/v");
    assert_eq!(verified.algorithm, SignatureAlgorithm::Es256);
    assert!(verified.is_valid);

    let req = &mock.requests()[0];
    assert_eq!(req.uri, "https://vault.example.net/keys/k/v/verify?api-version=7.5");
    let body = req.json();
    assert_eq!(body["alg"], "ES256");
    assert_eq!(base64url_decode(body["digest"].as_str().unwrap())?, vec![0; 32]);
    assert_eq!(base64url_decode(body["value"].as_str().unwrap())?, vec![1; 64]);
    Ok(())
}

#[tokio::test]
async fn test_aes_key_wrap_is_forwarded() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(&[9u8; 40])}).to_string(),
    );
    let client = from_key(&mock, rsa_key(KEY_A, &all_operations()));

    let wrapped = client.wrap_key(KeyWrapAlgorithm::A256Kw, &[7; 32]).await?;
    assert_eq!(wrapped.encrypted_key, vec![9; 40]);
    assert_eq!(wrapped.algorithm, KeyWrapAlgorithm::A256Kw);

    assert_eq!(mock.calls(), 1);
    let req = &mock.requests()[0];
    assert_eq!(req.uri, format!("{KEY_ID}/wrapKey?api-version=7.5"));
    assert_eq!(req.json()["alg"], "A256KW");
    Ok(())
}

#[tokio::test]
async fn test_ec_signature_on_rsa_key_is_forwarded() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(&[3u8; 64])}).to_string(),
    );
    let client = from_key(&mock, rsa_key(KEY_A, &all_operations()));

    let signed = client.sign_data(SignatureAlgorithm::Es256, b"payload").await?;
    assert_eq!(signed.signature, vec![3; 64]);
    assert_eq!(mock.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_private_operation_without_private_key_goes_remote() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(b"secret")}).to_string(),
    );
    let client = from_key(&mock, public_only(rsa_key(KEY_A, &all_operations())));

    let encrypted = client
        .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep, b"secret".to_vec()))
        .await?;
    assert_eq!(mock.calls(), 0);

    let decrypted = client
        .decrypt(DecryptParameters::new(encrypted.algorithm, encrypted.ciphertext))
        .await?;
    assert_eq!(decrypted.plaintext, b"secret");
    assert_eq!(mock.calls(), 1);
    assert_eq!(mock.requests()[0].uri, format!("{KEY_ID}/decrypt?api-version=7.5"));
    Ok(())
}

#[tokio::test]
async fn test_non_rsa_key_always_goes_remote() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(&[5u8; 24])}).to_string(),
    );
    let key = JsonWebKey {
        id: KEY_ID.to_string(),
        key_type: KeyType::Oct,
        key_ops: all_operations(),
        k: Some(vec![0; 32]),
        ..Default::default()
    };
    let client = from_key(&mock, key);

    let wrapped = client.wrap_key(KeyWrapAlgorithm::A256Kw, &[1; 16]).await?;
    assert_eq!(wrapped.encrypted_key, vec![5; 24]);
    assert_eq!(mock.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_remote_encrypt_with_iv_and_aad() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({
            "kid": KEY_ID,
            "value": base64url_encode(b"ciphertext"),
            "iv": base64url_encode(&[1u8; 12]),
            "tag": base64url_encode(&[2u8; 16]),
        })
        .to_string(),
    );
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), force_remote())?;

    let params = EncryptParameters::new(EncryptionAlgorithm::A256Gcm, b"plaintext".to_vec())
        .with_iv(vec![1; 12])
        .with_additional_authenticated_data(Vec::new());
    let encrypted = client.encrypt(params).await?;
    assert_eq!(encrypted.ciphertext, b"ciphertext");
    assert_eq!(encrypted.iv, Some(vec![1; 12]));
    assert_eq!(encrypted.authentication_tag, Some(vec![2; 16]));
    assert_eq!(encrypted.additional_authenticated_data, None);
    assert_eq!(encrypted.algorithm, EncryptionAlgorithm::A256Gcm);

    let body = mock.requests()[0].json();
    assert_eq!(
        body,
        json!({
            "alg": "A256GCM",
            "value": base64url_encode(b"plaintext"),
            "iv": base64url_encode(&[1u8; 12]),
            "aad": "",
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_service_error_carries_status_and_body() {
    let mock = MockHttpSend::default().respond(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"code":"Throttled"}}"#,
    );
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), force_remote()).unwrap();

    let err = client
        .sign(SignatureAlgorithm::Rs256, &[0; 32])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(
        err.body().map(|b| b.to_vec()),
        Some(br#"{"error":{"code":"Throttled"}}"#.to_vec())
    );
    assert!(err.is_retryable());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_transport_error_is_propagated() {
    let mock = MockHttpSend::default().fail();
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), force_remote()).unwrap();

    let err = client
        .unwrap_key(KeyWrapAlgorithm::RsaOaep, &[0; 256])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}

fn key_bundle(key: &JsonWebKey) -> String {
    json!({
        "key": key,
        "attributes": {"enabled": true, "created": 1647156004, "updated": 1647156004},
    })
    .to_string()
}

#[tokio::test]
async fn test_key_material_is_fetched_once() -> anyhow::Result<()> {
    let key = public_only(rsa_key(KEY_A, &all_operations()));
    let mock = MockHttpSend::default()
        .respond(StatusCode::OK, key_bundle(&key))
        .respond(
            StatusCode::OK,
            json!({"kid": KEY_ID, "value": base64url_encode(b"two")}).to_string(),
        );
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), config())?;

    let first = client
        .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep256, b"one".to_vec()))
        .await?;
    assert_eq!(first.key_id, KEY_ID);
    client
        .encrypt(EncryptParameters::new(EncryptionAlgorithm::Rsa15, b"two".to_vec()))
        .await?;

    assert_eq!(mock.calls(), 1);
    let get = &mock.requests()[0];
    assert_eq!(get.method, Method::GET);
    assert_eq!(get.uri, format!("{KEY_ID}?api-version=7.5"));

    // The fetched key has no private part, decrypt goes to the service.
    let decrypted = client
        .decrypt(DecryptParameters::new(EncryptionAlgorithm::RsaOaep256, first.ciphertext))
        .await?;
    assert_eq!(decrypted.plaintext, b"two");
    assert_eq!(mock.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_forbidden_key_fetch_falls_back_to_remote() -> anyhow::Result<()> {
    let remote_result = json!({"kid": KEY_ID, "value": base64url_encode(b"ct")}).to_string();
    let mock = MockHttpSend::default()
        .respond(StatusCode::FORBIDDEN, r#"{"error":{"code":"Forbidden"}}"#)
        .respond(StatusCode::OK, remote_result.clone())
        .respond(StatusCode::OK, remote_result);
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), config())?;

    for _ in 0..2 {
        let encrypted = client
            .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep, b"pt".to_vec()))
            .await?;
        assert_eq!(encrypted.ciphertext, b"ct");
    }

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[1].uri, format!("{KEY_ID}/encrypt?api-version=7.5"));
    assert_eq!(requests[2].uri, format!("{KEY_ID}/encrypt?api-version=7.5"));
    Ok(())
}

#[tokio::test]
async fn test_failed_key_fetch_is_retried() -> anyhow::Result<()> {
    let key = rsa_key(KEY_A, &all_operations());
    let mock = MockHttpSend::default()
        .fail()
        .respond(StatusCode::OK, key_bundle(&key));
    let client = CryptographyClient::new(KEY_ID, mock.context(), token(), config())?;

    let err = client
        .sign_data(SignatureAlgorithm::Rs256, b"payload")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let signed = client.sign_data(SignatureAlgorithm::Rs256, b"payload").await?;
    assert!(
        client
            .verify_data(SignatureAlgorithm::Rs256, b"payload", &signed.signature)
            .await?
            .is_valid
    );
    assert_eq!(mock.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_key_client_shares_pipeline() -> anyhow::Result<()> {
    let key = rsa_key(KEY_A, &all_operations());
    let mock = MockHttpSend::default()
        .respond(StatusCode::OK, key_bundle(&key))
        .respond(StatusCode::OK, key_bundle(&key));
    let client = KeyClient::new(
        "https://myvault.vault.azure.net",
        mock.context(),
        token(),
        config(),
    )?;

    let fetched = client
        .get_key("my-key", Some("78deebed173b48e48f55abf87ed4cf71"))
        .await?;
    assert_eq!(fetched.id(), KEY_ID);
    assert_eq!(fetched.name(), "my-key");
    assert_eq!(fetched.properties.version, "78deebed173b48e48f55abf87ed4cf71");
    assert_eq!(fetched.properties.enabled, Some(true));
    assert_eq!(mock.requests()[0].uri, format!("{KEY_ID}?api-version=7.5"));

    let crypto = client.get_cryptography_client("my-key", Some("78deebed173b48e48f55abf87ed4cf71"))?;
    let wrapped = crypto.wrap_key(KeyWrapAlgorithm::RsaOaep, &[4; 32]).await?;
    let unwrapped = crypto
        .unwrap_key(KeyWrapAlgorithm::RsaOaep, &wrapped.encrypted_key)
        .await?;
    assert_eq!(unwrapped.key, vec![4; 32]);

    assert_eq!(mock.calls(), 2);
    for req in mock.requests() {
        assert_eq!(req.authorization.as_deref(), Some("Bearer token"));
    }
    Ok(())
}

#[tokio::test]
async fn test_force_remote_from_env() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(StatusCode::OK, r#"{"value":false}"#);
    let ctx = mock.context().with_env(keyvault_crypto_core::StaticEnv {
        envs: std::collections::HashMap::from_iter([(
            "AZURE_KEYVAULT_FORCE_REMOTE".to_string(),
            "true".to_string(),
        )]),
    });
    let config = Config::default().from_env(&ctx);
    let client = CryptographyClient::from_key(
        vault_key(rsa_key(KEY_A, &all_operations())),
        ctx,
        token(),
        config,
    )?;

    let verified = client
        .verify_data(SignatureAlgorithm::Ps256, b"payload", &[0; 256])
        .await?;
    assert!(!verified.is_valid);
    assert_eq!(mock.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_key_client_and_cryptography_client_address_same_key() -> anyhow::Result<()> {
    let key = rsa_key(KEY_A, &all_operations());
    let mock = MockHttpSend::default()
        .respond(StatusCode::OK, key_bundle(&key))
        .respond(StatusCode::OK, key_bundle(&key))
        .respond(
            StatusCode::OK,
            json!({"kid": KEY_ID, "value": base64url_encode(&[9u8; 40])}).to_string(),
        );
    let client = KeyClient::new(
        "https://myvault.vault.azure.net",
        mock.context(),
        token(),
        config(),
    )?;

    client.get_key("a/b", None).await?;
    let crypto = client.get_cryptography_client("a/b", None)?;
    assert_eq!(crypto.key_id(), "https://myvault.vault.azure.net/keys/a%2Fb");
    crypto.wrap_key(KeyWrapAlgorithm::A256Kw, &[7; 32]).await?;

    let uris: Vec<_> = mock.requests().into_iter().map(|r| (r.method, r.uri)).collect();
    assert_eq!(
        uris,
        vec![
            (Method::GET, "https://myvault.vault.azure.net/keys/a%2Fb?api-version=7.5".to_string()),
            (Method::GET, "https://myvault.vault.azure.net/keys/a%2Fb?api-version=7.5".to_string()),
            (
                Method::POST,
                "https://myvault.vault.azure.net/keys/a%2Fb/wrapKey?api-version=7.5".to_string()
            ),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_force_remote_without_key_id_is_rejected() {
    let mock = MockHttpSend::default();
    let mut key = rsa_key(KEY_A, &all_operations());
    key.id = String::new();

    let err = CryptographyClient::from_key(vault_key(key.clone()), mock.context(), token(), force_remote())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let client = CryptographyClient::from_key(vault_key(key), mock.context(), token(), config()).unwrap();
    client
        .sign_data(SignatureAlgorithm::Rs256, b"payload")
        .await
        .unwrap();
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_unusable_key_material_uses_service() -> anyhow::Result<()> {
    let mock = MockHttpSend::default().respond(
        StatusCode::OK,
        json!({"kid": KEY_ID, "value": base64url_encode(&[5u8; 256])}).to_string(),
    );
    let mut key = rsa_key(KEY_A, &all_operations());
    key.n = None;

    let client = from_key(&mock, key);
    let signed = client.sign_data(SignatureAlgorithm::Rs256, b"payload").await?;
    assert_eq!(signed.signature, vec![5; 256]);
    assert_eq!(mock.calls(), 1);
    assert_eq!(mock.requests()[0].uri, format!("{KEY_ID}/sign?api-version=7.5"));
    Ok(())
}
