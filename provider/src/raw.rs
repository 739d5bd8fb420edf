//! Raw transaction and block views as returned by a node or explorer.
//!
//! Field names follow the verbose `getrawtransaction` / `getblock` JSON so
//! responses deserialize directly. Unknown fields are ignored.

use peervote_types::{Address, Amount, BlockHash, Timestamp, TxId};
use serde::{Deserialize, Deserializer};

/// Script opcode that marks an unspendable data output.
const OP_RETURN: u8 = 0x6a;
const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawTransaction {
    pub txid: TxId,
    /// Zero while the transaction is unmined.
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub blocktime: Option<Timestamp>,
    #[serde(default)]
    pub blockhash: Option<BlockHash>,
    #[serde(default)]
    pub vin: Vec<RawInput>,
    #[serde(default)]
    pub vout: Vec<RawOutput>,
}

impl RawTransaction {
    /// Payload of the first data output, if the transaction has one.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.vout.iter().find_map(RawOutput::data)
    }

    /// Whether any output pays `address`.
    pub fn pays_to(&self, address: &Address) -> bool {
        self.vout
            .iter()
            .any(|o| o.addresses().any(|a| a == address))
    }

    pub fn is_mined(&self) -> bool {
        self.blockhash.is_some() && self.confirmations > 0
    }
}

/// A transaction input. Coinbase inputs carry no outpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub txid: Option<TxId>,
    #[serde(default)]
    pub vout: Option<u32>,
    #[serde(default)]
    pub coinbase: Option<String>,
}

impl RawInput {
    pub fn spending(txid: TxId, vout: u32) -> Self {
        Self {
            txid: Some(txid),
            vout: Some(vout),
            coinbase: None,
        }
    }

    /// The outpoint this input spends.
    pub fn outpoint(&self) -> Option<(TxId, u32)> {
        Some((self.txid?, self.vout?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawOutput {
    pub n: u32,
    #[serde(deserialize_with = "coins")]
    pub value: Amount,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScriptPubKey {
    #[serde(default)]
    pub asm: String,
    #[serde(default)]
    pub hex: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Newer nodes report a single `address` instead of `addresses`.
    #[serde(default)]
    pub address: Option<Address>,
}

impl RawOutput {
    /// A value output paying `address`.
    pub fn payment(n: u32, address: Address, value: Amount) -> Self {
        Self {
            n,
            value,
            script_pub_key: ScriptPubKey {
                kind: "pubkeyhash".into(),
                addresses: vec![address],
                ..ScriptPubKey::default()
            },
        }
    }

    /// A data output carrying `payload` in an `OP_RETURN` push.
    pub fn data_output(n: u32, payload: &[u8]) -> Self {
        let mut script = vec![OP_RETURN];
        match payload.len() {
            0 => script.push(0x00),
            len @ 1..=0x4b => script.push(len as u8),
            len @ 0x4c..=0xff => script.extend_from_slice(&[OP_PUSHDATA1, len as u8]),
            len => script.extend_from_slice(&[
                OP_PUSHDATA2,
                (len & 0xff) as u8,
                ((len >> 8) & 0xff) as u8,
            ]),
        }
        script.extend_from_slice(payload);
        Self {
            n,
            value: Amount::ZERO,
            script_pub_key: ScriptPubKey {
                asm: format!("OP_RETURN {}", hex::encode(payload)),
                hex: hex::encode(&script),
                kind: "nulldata".into(),
                ..ScriptPubKey::default()
            },
        }
    }

    /// Addresses this output pays.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.script_pub_key
            .addresses
            .iter()
            .chain(self.script_pub_key.address.iter())
    }

    /// The pushed payload if this is an `OP_RETURN` output.
    pub fn data(&self) -> Option<Vec<u8>> {
        let script = hex::decode(&self.script_pub_key.hex).ok()?;
        parse_op_return(&script).map(<[u8]>::to_vec)
    }
}

/// Extract the single push following `OP_RETURN`.
fn parse_op_return(script: &[u8]) -> Option<&[u8]> {
    let (&op, rest) = script.split_first()?;
    if op != OP_RETURN {
        return None;
    }
    let (&push, rest) = match rest.split_first() {
        Some(split) => split,
        None => return Some(&[]),
    };
    let (len, body) = match push {
        0x00 => (0, rest),
        0x01..=0x4b => (push as usize, rest),
        OP_PUSHDATA1 => {
            let (&len, body) = rest.split_first()?;
            (len as usize, body)
        }
        OP_PUSHDATA2 => {
            if rest.len() < 2 {
                return None;
            }
            (u16::from_le_bytes([rest[0], rest[1]]) as usize, &rest[2..])
        }
        _ => return None,
    };
    body.get(..len)
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawBlock {
    pub hash: BlockHash,
    pub height: u64,
}

fn coins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    f64::deserialize(deserializer).map(Amount::from_coins)
}
