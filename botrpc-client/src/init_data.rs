//! Signing and verification of web app init data.
//!
//! Init data is an `&`-joined list of URL-encoded `key=value` pairs ending
//! in `hash=<hex>`. The hash is an HMAC-SHA256 over every other pair, sorted
//! by key and joined as `key=value` lines, keyed with
//! `HMAC-SHA256(key = "WebAppData", msg = bot_token)`.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Oldest `auth_date` accepted by default: 30 days.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2_592_000);

const SECRET_KEY_SALT: &[u8] = b"WebAppData";
const HASH_KEY: &str = "hash";
const TIMESTAMP_KEY: &str = "timestamp";

/// Fields carrying JSON objects.
const JSON_FIELDS: &[&str] = &["user", "receiver", "chat"];
/// Fields carrying integers.
const INTEGER_FIELDS: &[&str] = &["can_send_after", "auth_date"];

/// Signs and verifies init data for one bot token.
#[derive(Clone)]
pub struct InitDataSigner {
    secret: Vec<u8>,
}

impl fmt::Debug for InitDataSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitDataSigner").finish_non_exhaustive()
    }
}

impl InitDataSigner {
    pub fn new(token: &str) -> Self {
        let mut mac = new_mac(SECRET_KEY_SALT);
        mac.update(token.as_bytes());
        Self {
            secret: mac.finalize().into_bytes().to_vec(),
        }
    }

    /// Lowercase hex HMAC over `pairs`, sorted by key and joined with `\n`.
    pub fn fingerprint<'a, I>(&self, pairs: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        hex::encode(self.mac_over(pairs).finalize().into_bytes())
    }

    fn mac_over<'a, I>(&self, pairs: I) -> HmacSha256
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pairs: Vec<_> = pairs.into_iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let check_string = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut mac = new_mac(&self.secret);
        mac.update(check_string.as_bytes());
        mac
    }

    /// Sign `data`, stamping it with the current time.
    pub fn sign(&self, data: &Map<String, Value>) -> String {
        self.sign_at(data, unix_now())
    }

    /// Sign `data` with an explicit `timestamp` (unix seconds).
    ///
    /// Strings are kept raw; every other value is sent as JSON text. A `hash`
    /// entry in `data` is ignored and a `timestamp` entry is overwritten.
    pub fn sign_at(&self, data: &Map<String, Value>, timestamp: u64) -> String {
        let mut pairs: Vec<(String, String)> = data
            .iter()
            .filter(|(key, _)| key.as_str() != HASH_KEY && key.as_str() != TIMESTAMP_KEY)
            .map(|(key, value)| (key.clone(), field_text(value)))
            .collect();
        pairs.push((TIMESTAMP_KEY.to_string(), timestamp.to_string()));

        let hash = self.fingerprint(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        serializer.append_pair(HASH_KEY, &hash);
        serializer.finish()
    }

    /// Verify `init_data` against the current time.
    ///
    /// Returns the decoded fields, or `None` if the payload is malformed,
    /// tampered with or older than `max_age`. A zero `max_age` disables the
    /// age check.
    pub fn verify(&self, init_data: &str, max_age: Duration) -> Option<Map<String, Value>> {
        self.verify_at(init_data, max_age, unix_now())
    }

    /// Verify `init_data` as if the current time were `now` (unix seconds).
    pub fn verify_at(
        &self,
        init_data: &str,
        max_age: Duration,
        now: u64,
    ) -> Option<Map<String, Value>> {
        let mut hash = None;
        let mut pairs: Vec<(String, String)> = Vec::new();

        for piece in init_data.split('&') {
            if piece.split('=').count() != 2 {
                continue;
            }
            let Some((key, value)) = form_urlencoded::parse(piece.as_bytes()).next() else {
                continue;
            };
            if key == HASH_KEY {
                hash = Some(value.into_owned());
                continue;
            }
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value.into_owned(),
                None => pairs.push((key.into_owned(), value.into_owned())),
            }
        }

        let mut fields = Map::new();
        for (key, value) in &pairs {
            fields.insert(key.clone(), coerce(key, value)?);
        }

        let hash = hash.filter(|h| is_lower_hex(h))?;
        let expected = hex::decode(hash).ok()?;
        self.mac_over(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .verify_slice(&expected)
            .ok()?;

        if let Some(auth_date) = fields.get("auth_date").and_then(Value::as_i64) {
            if !max_age.is_zero() {
                let age = i64::try_from(now).unwrap_or(i64::MAX).saturating_sub(auth_date);
                if age > i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX) {
                    return None;
                }
            }
        }

        Some(fields)
    }
}

fn new_mac(key: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length.
    <HmacSha256 as Mac>::new_from_slice(key).unwrap_or_else(|_| unreachable!())
}

/// The fingerprint is compared as a lowercase hex string.
fn is_lower_hex(hash: &str) -> bool {
    hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coerce(key: &str, value: &str) -> Option<Value> {
    if JSON_FIELDS.contains(&key) {
        serde_json::from_str(value).ok()
    } else if INTEGER_FIELDS.contains(&key) {
        value.parse::<i64>().ok().map(Value::from)
    } else {
        Some(Value::String(value.to_string()))
    }
}
