//! Network selection and operator inputs.
//!
//! Everything here is resolved once, before the first account is touched. Any
//! failure is a fatal misconfiguration and aborts the run.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_KEYS_FILE: &str = "migrating_private_keys.txt";
pub const DEFAULT_TARGET_ADDRESS_FILE: &str = "target_address.txt";
pub const DEFAULT_SENDER_KEY_FILE: &str = "eth_sender_private_key.txt";

/// One entry of the networks file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkEntry {
    claim_api_url: String,
    rpc_url: String,
    contract_address: String,
    #[serde(default)]
    chain_id: Option<u64>,
}

/// Resolved settings for one named network, threaded explicitly into the
/// oracle client, the contract client and the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub claim_api_url: String,
    pub rpc_url: String,
    pub contract_address: Address,
    /// Queried from the RPC endpoint when absent.
    pub chain_id: Option<u64>,
}

/// Load `path` and pick the entry called `name`.
///
/// File layout:
/// `{ "<name>": { "claimApiUrl": .., "rpcUrl": .., "contractAddress": .., "chainId": .. } }`
pub fn resolve_network(path: &Path, name: &str) -> Result<NetworkConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading networks file {}", path.display()))?;
    let mut entries: BTreeMap<String, NetworkEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing JSON in {}", path.display()))?;

    let entry = entries.remove(name).ok_or_else(|| {
        let known: Vec<&str> = entries.keys().map(String::as_str).collect();
        anyhow!("unknown network `{name}` (known: {})", known.join(", "))
    })?;

    let contract_address = parse_address(&entry.contract_address)
        .with_context(|| format!("invalid contractAddress for network `{name}`"))?;

    Ok(NetworkConfig {
        name: name.to_string(),
        claim_api_url: entry.claim_api_url,
        rpc_url: entry.rpc_url,
        contract_address,
        chain_id: entry.chain_id,
    })
}

/// Private key text that must never reach a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKeyText(String);

impl SecretKeyText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKeyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKeyText(<redacted>)")
    }
}

/// One key per line; blank lines and `#` comments are ignored.
///
/// Keys are not validated here: a malformed key fails only its own account.
pub fn read_private_keys(path: &Path) -> Result<Vec<SecretKeyText>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading private keys from {}", path.display()))?;
    let keys = parse_private_keys(&raw);
    if keys.is_empty() {
        bail!("no private keys found in {}", path.display());
    }
    Ok(keys)
}

pub fn parse_private_keys(raw: &str) -> Vec<SecretKeyText> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(SecretKeyText::new)
        .collect()
}

pub fn parse_address(text: &str) -> Result<Address> {
    text.trim()
        .parse::<Address>()
        .map_err(|e| anyhow!("`{}` is not a 20-byte hex address: {e}", text.trim()))
}

/// Destination address, either given inline or read from a file.
pub fn resolve_destination(inline: Option<&str>, file: Option<&Path>) -> Result<Address> {
    if let Some(text) = inline {
        return parse_address(text).context("invalid target address");
    }
    let path = file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_ADDRESS_FILE));
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading target address from {}", path.display()))?;
    parse_address(&raw).with_context(|| format!("invalid target address in {}", path.display()))
}

/// Funding key for the destination chain, either given inline or read from a file.
pub fn resolve_sender_key(inline: Option<&str>, file: Option<&Path>) -> Result<SecretKeyText> {
    if let Some(text) = inline {
        return non_empty_secret(text).context("empty sender private key");
    }
    let path = file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SENDER_KEY_FILE));
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading sender private key from {}", path.display()))?;
    non_empty_secret(&raw).with_context(|| format!("empty sender private key in {}", path.display()))
}

fn non_empty_secret(text: &str) -> Result<SecretKeyText> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("no key material");
    }
    Ok(SecretKeyText::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const NETWORKS: &str = r#"{
        "lisk-sepolia": {
            "claimApiUrl": "https://claim.example.test/rpc",
            "rpcUrl": "https://rpc.example.test",
            "contractAddress": "0x1111111111111111111111111111111111111111",
            "chainId": 4202
        },
        "local": {
            "claimApiUrl": "http://127.0.0.1:3000/rpc",
            "rpcUrl": "http://127.0.0.1:8545",
            "contractAddress": "0x2222222222222222222222222222222222222222"
        }
    }"#;

    #[test]
    fn resolves_named_network() {
        let file = write_temp(NETWORKS);
        let network = resolve_network(file.path(), "lisk-sepolia").unwrap();
        assert_eq!(network.name, "lisk-sepolia");
        assert_eq!(network.claim_api_url, "https://claim.example.test/rpc");
        assert_eq!(network.contract_address, Address::repeat_byte(0x11));
        assert_eq!(network.chain_id, Some(4202));

        let local = resolve_network(file.path(), "local").unwrap();
        assert_eq!(local.chain_id, None);
    }

    #[test]
    fn unknown_network_is_fatal() {
        let file = write_temp(NETWORKS);
        let err = resolve_network(file.path(), "mainnet").unwrap_err();
        assert!(err.to_string().contains("unknown network `mainnet`"));
    }

    #[test]
    fn bad_contract_address_is_fatal() {
        let file = write_temp(
            r#"{"x": {"claimApiUrl": "a", "rpcUrl": "b", "contractAddress": "0x1234"}}"#,
        );
        assert!(resolve_network(file.path(), "x").is_err());
    }

    #[test]
    fn private_keys_skip_blank_and_comment_lines() {
        let keys = parse_private_keys("# batch 1\nabcd\n\n  ef01  \n#ff\n");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].expose(), "abcd");
        assert_eq!(keys[1].expose(), "ef01");
    }

    #[test]
    fn empty_key_file_is_fatal() {
        let file = write_temp("\n# nothing here\n");
        assert!(read_private_keys(file.path()).is_err());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = SecretKeyText::new("deadbeef");
        assert!(!format!("{secret:?}").contains("deadbeef"));
    }

    #[test]
    fn destination_prefers_inline_then_file() {
        let inline = resolve_destination(Some("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"), None).unwrap();
        assert_eq!(inline, Address::repeat_byte(0xaa));

        let file = write_temp("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\n");
        let from_file = resolve_destination(None, Some(file.path())).unwrap();
        assert_eq!(from_file, Address::repeat_byte(0xbb));

        assert!(resolve_destination(Some("not-an-address"), None).is_err());
    }

    #[test]
    fn sender_key_must_not_be_empty() {
        let file = write_temp("  \n");
        assert!(resolve_sender_key(None, Some(file.path())).is_err());
        assert_eq!(resolve_sender_key(Some(" 0x01 "), None).unwrap().expose(), "0x01");
    }
}
