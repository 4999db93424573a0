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

use std::env;

use anyhow::Result;
use keyvault_crypto_core::{Context, OsEnv};
use keyvault_crypto_http_send_reqwest::ReqwestHttpSend;
use keyvault_crypto_keys::{
    Config, CryptographyClient, DecryptParameters, EncryptParameters, EncryptionAlgorithm,
    EnvCredentialProvider, KeyClient, SignatureAlgorithm,
};
use log::{debug, warn};

/// Needs `KEYVAULT_CRYPTO_TEST=on`, `KEYVAULT_CRYPTO_KEY_ID` pointing to an
/// RSA key and `AZURE_KEYVAULT_ACCESS_TOKEN`.
fn init_live_test() -> Option<(Context, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("KEYVAULT_CRYPTO_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let key_id = env::var("KEYVAULT_CRYPTO_KEY_ID").expect("env KEYVAULT_CRYPTO_KEY_ID must set");
    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    Some((ctx, key_id))
}

#[tokio::test]
async fn test_live_remote_round_trip() -> Result<()> {
    let Some((ctx, key_id)) = init_live_test() else {
        warn!("KEYVAULT_CRYPTO_TEST is not set, skipped");
        return Ok(());
    };

    let config = Config {
        force_remote: true,
        ..Default::default()
    }
    .from_env(&ctx);
    let client = CryptographyClient::new(&key_id, ctx, EnvCredentialProvider, config)?;

    let encrypted = client
        .encrypt(EncryptParameters::new(EncryptionAlgorithm::RsaOaep256, b"live test".to_vec()))
        .await?;
    debug!("encrypted by {}", encrypted.key_id);

    let decrypted = client
        .decrypt(DecryptParameters::new(encrypted.algorithm, encrypted.ciphertext))
        .await?;
    assert_eq!(decrypted.plaintext, b"live test");

    let signed = client.sign_data(SignatureAlgorithm::Rs256, b"live test").await?;
    let verified = client
        .verify_data(SignatureAlgorithm::Rs256, b"live test", &signed.signature)
        .await?;
    assert!(verified.is_valid);
    Ok(())
}

#[tokio::test]
async fn test_live_local_verify_of_remote_signature() -> Result<()> {
    let Some((ctx, key_id)) = init_live_test() else {
        warn!("KEYVAULT_CRYPTO_TEST is not set, skipped");
        return Ok(());
    };

    let remote = CryptographyClient::new(
        &key_id,
        ctx.clone(),
        EnvCredentialProvider,
        Config {
            force_remote: true,
            ..Default::default()
        },
    )?;
    let signed = remote.sign_data(SignatureAlgorithm::Ps256, b"live test").await?;

    let id = keyvault_crypto_keys::KeyVaultKeyIdentifier::parse(&key_id)?;
    let keys = KeyClient::new(&id.vault_url, ctx, EnvCredentialProvider, Config::default())?;
    let key = keys.get_key(&id.name, id.version.as_deref()).await?;
    let local = CryptographyClient::local(key.key)?;

    let verified = local
        .verify_data(SignatureAlgorithm::Ps256, b"live test", &signed.signature)
        .await?;
    assert!(verified.is_valid);
    Ok(())
}
