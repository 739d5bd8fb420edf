//! VoteInit / VoteCast codec.
//!
//! Wire schema (protobuf field number, type):
//!
//! ```text
//! VoteInit                          VoteCast
//!   1 version        uint32           1 vote_init_id  bytes (32)
//!   2 description    string           2 choice_index  uint32
//!   3 start_block    uint32
//!   4 end_block      uint32
//!   5 count_mode     enum
//!   6 choices        repeated string
//!   7 vote_metainfo  bytes
//! ```
//!
//! Field 1 has a different wire type in each message, so a cast never decodes
//! as an init and vice versa. Unknown fields are skipped.

use peervote_types::TxId;
use prost::{Enumeration, Message};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{DecodeError, EncodeError};

/// How valid casts are aggregated into a result.
///
/// Only [`CountMode::Simple`] has a defined tally rule. The weighted modes are
/// reserved wire values: they decode, but tallying them is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Enumeration)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum CountMode {
    /// One valid cast counts as one vote.
    Simple = 1,
    /// Reserved: weight by card balance.
    WeightCardBalance = 3,
    /// Reserved: weight by card-days.
    WeightCardDays = 7,
}

impl CountMode {
    /// Symbolic name as used in protocol documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::WeightCardBalance => "WEIGHT_CARD_BALANCE",
            Self::WeightCardDays => "WEIGHT_CARD_DAYS",
        }
    }
}

/// A decoded vote proposal, without ledger context (deck, id, sender).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteInitRecord {
    pub version: u32,
    pub description: String,
    pub start_block: u32,
    pub end_block: u32,
    pub count_mode: CountMode,
    pub choices: Vec<String>,
    /// Opaque blob, typically a URI. Empty when absent.
    #[serde(default)]
    pub vote_metainfo: Vec<u8>,
}

impl VoteInitRecord {
    /// Check the invariants every proposal must satisfy: at least two
    /// distinct, non-empty choices and a non-empty block range.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.choices.len() < 2 {
            return Err(DecodeError::TooFewChoices(self.choices.len()));
        }
        let mut seen = HashSet::with_capacity(self.choices.len());
        for (i, choice) in self.choices.iter().enumerate() {
            if choice.is_empty() {
                return Err(DecodeError::EmptyChoice(i));
            }
            if !seen.insert(choice.as_str()) {
                return Err(DecodeError::DuplicateChoice(choice.clone()));
            }
        }
        if self.start_block >= self.end_block {
            return Err(DecodeError::InvalidBlockRange {
                start: self.start_block,
                end: self.end_block,
            });
        }
        Ok(())
    }
}

/// A decoded ballot: which proposal, which choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCastRecord {
    pub vote_init_id: TxId,
    pub choice_index: u32,
}

#[derive(Clone, PartialEq, Message)]
struct VoteInitMessage {
    #[prost(uint32, tag = "1")]
    version: u32,
    #[prost(string, tag = "2")]
    description: String,
    #[prost(uint32, tag = "3")]
    start_block: u32,
    #[prost(uint32, tag = "4")]
    end_block: u32,
    // Plain int32: no CountMode variant is 0, so the proto3 default must
    // stay 0 for SIMPLE to be written and an absent field to be rejected.
    #[prost(int32, tag = "5")]
    count_mode: i32,
    #[prost(string, repeated, tag = "6")]
    choices: Vec<String>,
    #[prost(bytes = "vec", tag = "7")]
    vote_metainfo: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct VoteCastMessage {
    #[prost(bytes = "vec", tag = "1")]
    vote_init_id: Vec<u8>,
    // Read wide so out-of-range varints are rejected instead of truncated.
    #[prost(uint64, tag = "2")]
    choice_index: u64,
}

/// Serialize a proposal. Deterministic for a given record.
pub fn encode_vote_init(record: &VoteInitRecord) -> Vec<u8> {
    VoteInitMessage {
        version: record.version,
        description: record.description.clone(),
        start_block: record.start_block,
        end_block: record.end_block,
        count_mode: record.count_mode as i32,
        choices: record.choices.clone(),
        vote_metainfo: record.vote_metainfo.clone(),
    }
    .encode_to_vec()
}

/// Parse and validate a proposal.
///
/// Any failure, including an unexpected end of buffer, is a [`DecodeError`];
/// decoding never panics and never returns a partially populated record.
pub fn decode_vote_init(bytes: &[u8]) -> Result<VoteInitRecord, DecodeError> {
    let msg = VoteInitMessage::decode(bytes)?;
    let count_mode = CountMode::try_from(msg.count_mode)
        .map_err(|_| DecodeError::UnknownCountMode(msg.count_mode))?;
    let record = VoteInitRecord {
        version: msg.version,
        description: msg.description,
        start_block: msg.start_block,
        end_block: msg.end_block,
        count_mode,
        choices: msg.choices,
        vote_metainfo: msg.vote_metainfo,
    };
    record.validate()?;
    Ok(record)
}

/// Serialize a ballot.
pub fn encode_vote_cast(record: &VoteCastRecord) -> Vec<u8> {
    VoteCastMessage {
        vote_init_id: record.vote_init_id.as_bytes().to_vec(),
        choice_index: u64::from(record.choice_index),
    }
    .encode_to_vec()
}

/// Parse a ballot. The referenced vote id must be exactly 32 bytes.
pub fn decode_vote_cast(bytes: &[u8]) -> Result<VoteCastRecord, DecodeError> {
    let msg = VoteCastMessage::decode(bytes)?;
    let vote_init_id = TxId::from_slice(&msg.vote_init_id)
        .map_err(|_| DecodeError::InvalidVoteInitId(msg.vote_init_id.len()))?;
    let choice_index = u32::try_from(msg.choice_index).map_err(|_| {
        DecodeError::Malformed(format!("choice index {} exceeds 32 bits", msg.choice_index))
    })?;
    Ok(VoteCastRecord {
        vote_init_id,
        choice_index,
    })
}

/// Refuse payloads that do not fit in a data output of `max` bytes.
pub fn check_size(bytes: &[u8], max: usize) -> Result<(), EncodeError> {
    if bytes.len() > max {
        return Err(EncodeError::TooLarge {
            size: bytes.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] =
        b"\x08\x01\x12\x0cmy test vote\x18\xf9\x87\x16 \xe1\x8f\x16(\x012\x02no2\x03yes2\x05maybe";

    fn sample_record() -> VoteInitRecord {
        VoteInitRecord {
            version: 1,
            description: "my test vote".into(),
            start_block: 361465,
            end_block: 362465,
            count_mode: CountMode::Simple,
            choices: vec!["no".into(), "yes".into(), "maybe".into()],
            vote_metainfo: Vec::new(),
        }
    }

    #[test]
    fn decode_reference_payload() {
        let record = decode_vote_init(SAMPLE).unwrap();
        assert_eq!(record, sample_record());
        assert_eq!(record.count_mode.name(), "SIMPLE");
        assert!(record.vote_metainfo.is_empty());
    }

    #[test]
    fn encode_reproduces_reference_payload() {
        assert_eq!(encode_vote_init(&sample_record()), SAMPLE);
    }

    #[test]
    fn metainfo_roundtrip() {
        let mut record = sample_record();
        record.vote_metainfo = b"https://imgur.com/my_pic.png".to_vec();
        let decoded = decode_vote_init(&encode_vote_init(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn unknown_fields_skipped() {
        let mut bytes = SAMPLE.to_vec();
        // field 15, varint 42
        bytes.extend_from_slice(&[0x78, 0x2a]);
        assert_eq!(decode_vote_init(&bytes).unwrap(), sample_record());
    }

    #[test]
    fn wire_type_mismatch_rejected() {
        // field 1 as length-delimited instead of varint
        let bytes = b"\x0a\x01\x01";
        assert!(matches!(
            decode_vote_init(bytes),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_count_modes_rejected() {
        let mut bytes = SAMPLE.to_vec();
        // flip count_mode value 1 -> 2
        let pos = bytes.windows(2).position(|w| w == [0x28, 0x01]).unwrap();
        bytes[pos + 1] = 0x02;
        assert_eq!(
            decode_vote_init(&bytes),
            Err(DecodeError::UnknownCountMode(2))
        );
        // dropping the field entirely leaves the proto3 default of 0
        let without: Vec<u8> = [&bytes[..pos], &bytes[pos + 2..]].concat();
        assert_eq!(
            decode_vote_init(&without),
            Err(DecodeError::UnknownCountMode(0))
        );
    }

    #[test]
    fn encoded_record_carries_count_mode_field() {
        let bytes = encode_vote_init(&sample_record());
        assert!(bytes.windows(2).any(|w| w == [0x28, 0x01]));
    }

    #[test]
    fn explicit_zero_count_mode_rejected() {
        let mut bytes = SAMPLE.to_vec();
        let pos = bytes.windows(2).position(|w| w == [0x28, 0x01]).unwrap();
        bytes[pos + 1] = 0x00;
        assert_eq!(
            decode_vote_init(&bytes),
            Err(DecodeError::UnknownCountMode(0))
        );
    }

    #[test]
    fn reserved_modes_decode() {
        let mut record = sample_record();
        record.count_mode = CountMode::WeightCardDays;
        let decoded = decode_vote_init(&encode_vote_init(&record)).unwrap();
        assert_eq!(decoded.count_mode, CountMode::WeightCardDays);
    }

    #[test]
    fn too_few_choices_rejected() {
        let mut record = sample_record();
        record.choices = vec!["only".into()];
        assert_eq!(
            decode_vote_init(&encode_vote_init(&record)),
            Err(DecodeError::TooFewChoices(1))
        );
    }

    #[test]
    fn duplicate_and_empty_choices_rejected() {
        let mut record = sample_record();
        record.choices = vec!["yes".into(), "yes".into()];
        assert_eq!(
            record.validate(),
            Err(DecodeError::DuplicateChoice("yes".into()))
        );
        record.choices = vec!["yes".into(), String::new()];
        assert_eq!(record.validate(), Err(DecodeError::EmptyChoice(1)));
    }

    #[test]
    fn inverted_block_range_rejected() {
        let mut record = sample_record();
        record.start_block = 100;
        record.end_block = 100;
        assert_eq!(
            decode_vote_init(&encode_vote_init(&record)),
            Err(DecodeError::InvalidBlockRange {
                start: 100,
                end: 100
            })
        );
    }

    #[test]
    fn truncation_inside_field_is_decode_error() {
        // cut inside the description string
        assert!(matches!(
            decode_vote_init(&SAMPLE[..6]),
            Err(DecodeError::Malformed(_))
        ));
        // cut inside the start_block varint
        let pos = SAMPLE.iter().position(|&b| b == 0x18).unwrap();
        assert!(matches!(
            decode_vote_init(&SAMPLE[..pos + 2]),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn empty_buffer_is_decode_error() {
        assert!(decode_vote_init(&[]).is_err());
    }

    #[test]
    fn vote_cast_roundtrip() {
        let record = VoteCastRecord {
            vote_init_id: TxId::new([9u8; 32]),
            choice_index: 2,
        };
        let bytes = encode_vote_cast(&record);
        assert_eq!(decode_vote_cast(&bytes).unwrap(), record);
    }

    #[test]
    fn oversized_choice_index_rejected() {
        let mut bytes = vec![0x0a, 0x20];
        bytes.extend_from_slice(&[9u8; 32]);
        // field 2, varint 2^32 + 1
        bytes.extend_from_slice(&[0x10, 0x81, 0x80, 0x80, 0x80, 0x10]);
        assert!(matches!(
            decode_vote_cast(&bytes),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn max_choice_index_still_decodes() {
        let record = VoteCastRecord {
            vote_init_id: TxId::new([9u8; 32]),
            choice_index: u32::MAX,
        };
        assert_eq!(decode_vote_cast(&encode_vote_cast(&record)).unwrap(), record);
    }

    #[test]
    fn vote_cast_with_short_id_rejected() {
        // field 1, 3 bytes
        let bytes = b"\x0a\x03abc\x10\x01";
        assert_eq!(
            decode_vote_cast(bytes),
            Err(DecodeError::InvalidVoteInitId(3))
        );
    }

    #[test]
    fn init_and_cast_payloads_are_disjoint() {
        let cast = encode_vote_cast(&VoteCastRecord {
            vote_init_id: TxId::new([1u8; 32]),
            choice_index: 0,
        });
        assert!(decode_vote_init(&cast).is_err());
        assert!(decode_vote_cast(SAMPLE).is_err());
    }

    #[test]
    fn size_ceiling_enforced() {
        assert!(check_size(SAMPLE, 80).is_ok());
        assert_eq!(
            check_size(&[0u8; 81], 80),
            Err(EncodeError::TooLarge { size: 81, max: 80 })
        );
    }

    #[test]
    fn record_serializes_with_symbolic_mode() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["count_mode"], "SIMPLE");
        assert_eq!(json["end_block"], 362465);
    }
}
