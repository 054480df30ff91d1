//! Encrypted-at-rest infrastructure credentials (§4.2, §4.2a).
//!
//! The envelope is Argon2id (key derivation) + `ChaCha20Poly1305`
//! (authenticated encryption), self-describing on disk:
//! `MAGIC || salt(16) || nonce(12) || ciphertext‖tag`. A wrong password and
//! a corrupt/foreign file are indistinguishable to the caller — both
//! surface as `Error::BadCredentialsPassword`, per §7's propagation policy.

use argon2::Argon2;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use orch_domain::error::{Error, Result};
use orch_domain::plugin::{Infra, InfraContext};
use orch_domain::trace::TraceEvent;
use orch_domain::ui::{InputOpts, Ui};
use rand::RngCore;
use std::collections::HashMap;
use std::path::Path;

const MAGIC: &[u8] = b"SOC1";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const AAD: &[u8] = b"serialorch-creds-v1";

fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Other(format!("key derivation failed: {e}")))?;
    Ok(key)
}

/// Encrypted at-rest store for infrastructure credentials.
pub struct CredentialStore;

impl CredentialStore {
    /// Serialize `creds` to JSON, encrypt under `password`, and write the
    /// envelope to `path`.
    pub fn save(path: &Path, password: &str, creds: &HashMap<String, String>) -> Result<()> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let key = derive_key(password, &salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = serde_json::to_vec(creds)?;
        let ciphertext = cipher
            .encrypt(
                nonce,
                chacha20poly1305::aead::Payload {
                    msg: &plaintext,
                    aad: AAD,
                },
            )
            .map_err(|e| Error::CredentialsWriteFailed(e.to_string()))?;

        let mut envelope = Vec::with_capacity(4 + SALT_LEN + NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(MAGIC);
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        std::fs::write(path, envelope).map_err(|e| Error::CredentialsWriteFailed(e.to_string()))?;
        Ok(())
    }

    /// Decrypt the envelope at `path` under `password` and parse it as a
    /// credentials map. Any tampering, truncation, or wrong password
    /// surfaces as `Error::BadCredentialsPassword`.
    pub fn load(path: &Path, password: &str) -> Result<HashMap<String, String>> {
        let envelope = std::fs::read(path)?;
        if envelope.len() < 4 + SALT_LEN + NONCE_LEN || &envelope[..4] != MAGIC {
            return Err(Error::BadCredentialsPassword);
        }

        let salt: [u8; SALT_LEN] = envelope[4..4 + SALT_LEN].try_into().unwrap();
        let nonce_start = 4 + SALT_LEN;
        let nonce_end = nonce_start + NONCE_LEN;
        let nonce_bytes = &envelope[nonce_start..nonce_end];
        let ciphertext = &envelope[nonce_end..];

        let key = derive_key(password, &salt).map_err(|_| Error::BadCredentialsPassword)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(
                nonce,
                chacha20poly1305::aead::Payload {
                    msg: ciphertext,
                    aad: AAD,
                },
            )
            .map_err(|_| Error::BadCredentialsPassword)?;

        serde_json::from_slice(&plaintext).map_err(|_| Error::BadCredentialsPassword)
    }

    /// Fill `infra_ctx.infra_creds`, prompting through `ui` and persisting a
    /// freshly acquired map as needed (§4.2's five-step protocol).
    pub fn ensure(
        creds_path: &Path,
        local_dir: &Path,
        infra: &dyn Infra,
        infra_ctx: &mut InfraContext,
        ui: &dyn Ui,
    ) -> Result<()> {
        ui.header("Detecting infrastructure credentials...");

        if !creds_path.exists() {
            crate::layout::create_dir_0755(local_dir)?;
        }

        let creds = if creds_path.exists() {
            TraceEvent::CredentialsCacheFound {
                path: creds_path.display().to_string(),
            }
            .emit();
            ui.message(
                "Cached credentials found. Enter the password to decrypt them, \
                 or leave it empty to re-enter credentials.",
            );
            let password = ui.input(&InputOpts::new(
                "creds_password",
                "Encrypted Credentials Password",
                "Password used when these credentials were last saved.",
            ))?;

            if password.is_empty() {
                Self::reacquire(creds_path, local_dir, infra, infra_ctx, ui)?
            } else {
                Self::load(creds_path, &password)?
            }
        } else {
            Self::reacquire(creds_path, local_dir, infra, infra_ctx, ui)?
        };

        infra_ctx.infra_creds = creds;
        Ok(())
    }

    fn reacquire(
        creds_path: &Path,
        local_dir: &Path,
        infra: &dyn Infra,
        infra_ctx: &InfraContext,
        ui: &dyn Ui,
    ) -> Result<HashMap<String, String>> {
        ui.message(
            "No cached credentials (or re-entry was requested). You'll need to \
             re-enter credentials for the same account every time this happens.",
        );
        let creds = infra.creds(infra_ctx)?;

        let password = loop {
            let entered = ui.input(&InputOpts::new(
                "creds_password",
                "Password for Encrypting Credentials",
                "Used to encrypt the credentials just collected before writing them to disk.",
            ))?;
            if !entered.is_empty() {
                break entered;
            }
        };

        crate::layout::create_dir_0755(local_dir)?;
        Self::save(creds_path, &password, &creds)?;
        TraceEvent::CredentialsReacquired {
            path: creds_path.display().to_string(),
        }
        .emit();
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn creds_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds");
        let creds = creds_map(&[("AWS_KEY", "secret")]);
        CredentialStore::save(&path, "correct horse", &creds).unwrap();
        let loaded = CredentialStore::load(&path, "correct horse").unwrap();
        assert_eq!(loaded, creds);
    }

    #[test]
    fn wrong_password_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds");
        let creds = creds_map(&[("AWS_KEY", "secret")]);
        CredentialStore::save(&path, "correct horse", &creds).unwrap();
        let err = CredentialStore::load(&path, "wrong").unwrap_err();
        assert!(matches!(err, Error::BadCredentialsPassword));
    }

    #[test]
    fn truncated_file_is_bad_credentials_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds");
        std::fs::write(&path, b"SOC1").unwrap();
        let err = CredentialStore::load(&path, "anything").unwrap_err();
        assert!(matches!(err, Error::BadCredentialsPassword));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds");
        let creds = creds_map(&[("AWS_KEY", "secret")]);
        CredentialStore::save(&path, "pw", &creds).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.last_mut().unwrap();
        *last ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();
        let err = CredentialStore::load(&path, "pw").unwrap_err();
        assert!(matches!(err, Error::BadCredentialsPassword));
    }

    struct ScriptedUi {
        inputs: Mutex<Vec<String>>,
    }

    impl ScriptedUi {
        fn new(inputs: Vec<&str>) -> Self {
            Self {
                inputs: Mutex::new(inputs.into_iter().rev().map(String::from).collect()),
            }
        }
    }

    impl Ui for ScriptedUi {
        fn header(&self, _text: &str) {}
        fn message(&self, _text: &str) {}
        fn input(&self, _opts: &InputOpts) -> Result<String> {
            Ok(self.inputs.lock().unwrap().pop().unwrap_or_default())
        }
    }

    struct StubInfra {
        creds: HashMap<String, String>,
    }

    impl Infra for StubInfra {
        fn compile(
            &self,
            _ctx: &InfraContext,
        ) -> Result<orch_domain::plugin::CompileResult> {
            unreachable!()
        }
        fn execute(&self, _ctx: &InfraContext) -> Result<()> {
            unreachable!()
        }
        fn creds(&self, _ctx: &InfraContext) -> Result<HashMap<String, String>> {
            Ok(self.creds.clone())
        }
    }

    fn blank_infra_ctx() -> InfraContext {
        use orch_domain::dirbackend::DirectoryBackend;
        struct NoopDir;
        impl DirectoryBackend for NoopDir {
            fn name(&self) -> &str {
                "noop"
            }
        }
        InfraContext {
            dir: std::path::PathBuf::from("/tmp"),
            infra: orch_domain::graph::InfrastructureConfig {
                flavor: "default".into(),
                config: HashMap::new(),
            },
            shared: orch_domain::plugin::Shared {
                directory: std::sync::Arc::new(NoopDir),
                ui: std::sync::Arc::new(ScriptedUi::new(vec![])),
            },
            action: None,
            action_args: vec![],
            infra_creds: HashMap::new(),
        }
    }

    #[test]
    fn ensure_reacquires_on_empty_password() {
        let dir = tempfile::tempdir().unwrap();
        let creds_path = dir.path().join("local").join("creds");
        let local_dir = dir.path().join("local");

        // Seed existing creds under "correct", then simulate the user
        // entering an empty password to force re-acquisition under "new".
        std::fs::create_dir_all(&local_dir).unwrap();
        CredentialStore::save(&creds_path, "correct", &creds_map(&[("AWS_KEY", "x")])).unwrap();

        let ui = ScriptedUi::new(vec!["", "new"]);
        let infra = StubInfra {
            creds: creds_map(&[("AWS_KEY", "y")]),
        };
        let mut ctx = blank_infra_ctx();
        CredentialStore::ensure(&creds_path, &local_dir, &infra, &mut ctx, &ui).unwrap();

        assert_eq!(ctx.infra_creds.get("AWS_KEY").map(String::as_str), Some("y"));
        let reloaded = CredentialStore::load(&creds_path, "new").unwrap();
        assert_eq!(reloaded.get("AWS_KEY").map(String::as_str), Some("y"));
    }

    #[test]
    fn ensure_decrypts_with_correct_password() {
        let dir = tempfile::tempdir().unwrap();
        let local_dir = dir.path().join("local");
        std::fs::create_dir_all(&local_dir).unwrap();
        let creds_path = local_dir.join("creds");
        CredentialStore::save(&creds_path, "correct", &creds_map(&[("AWS_KEY", "x")])).unwrap();

        let ui = ScriptedUi::new(vec!["correct"]);
        let infra = StubInfra {
            creds: HashMap::new(),
        };
        let mut ctx = blank_infra_ctx();
        CredentialStore::ensure(&creds_path, &local_dir, &infra, &mut ctx, &ui).unwrap();
        assert_eq!(ctx.infra_creds.get("AWS_KEY").map(String::as_str), Some("x"));
    }

    #[test]
    fn ensure_surfaces_bad_password_error() {
        let dir = tempfile::tempdir().unwrap();
        let local_dir = dir.path().join("local");
        std::fs::create_dir_all(&local_dir).unwrap();
        let creds_path = local_dir.join("creds");
        CredentialStore::save(&creds_path, "correct", &creds_map(&[("AWS_KEY", "x")])).unwrap();

        let ui = ScriptedUi::new(vec!["wrong"]);
        let infra = StubInfra {
            creds: HashMap::new(),
        };
        let mut ctx = blank_infra_ctx();
        let err = CredentialStore::ensure(&creds_path, &local_dir, &infra, &mut ctx, &ui)
            .unwrap_err();
        assert!(matches!(err, Error::BadCredentialsPassword));
    }
}
