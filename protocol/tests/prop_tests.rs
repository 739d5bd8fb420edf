use proptest::prelude::*;

use peervote_protocol::{
    decode_vote_cast, decode_vote_init, encode_vote_cast, encode_vote_init, CountMode,
    VoteCastRecord, VoteInitRecord,
};
use peervote_types::TxId;

fn count_mode() -> impl Strategy<Value = CountMode> {
    prop_oneof![
        Just(CountMode::Simple),
        Just(CountMode::WeightCardBalance),
        Just(CountMode::WeightCardDays),
    ]
}

prop_compose! {
    fn valid_record()(
        version in 0u32..8,
        description in "[ -~]{0,24}",
        start_block in 0u32..1_000_000,
        span in 1u32..100_000,
        count_mode in count_mode(),
        choices in prop::collection::hash_set("[a-z0-9]{1,8}", 2..6),
        vote_metainfo in prop::collection::vec(any::<u8>(), 0..16),
    ) -> VoteInitRecord {
        let mut choices: Vec<String> = choices.into_iter().collect();
        choices.sort();
        VoteInitRecord {
            version,
            description,
            start_block,
            end_block: start_block + span,
            count_mode,
            choices,
            vote_metainfo,
        }
    }
}

proptest! {
    /// Every valid record survives encode -> decode field for field.
    #[test]
    fn vote_init_roundtrip(record in valid_record()) {
        let decoded = decode_vote_init(&encode_vote_init(&record)).unwrap();
        prop_assert_eq!(decoded, record);
    }

    /// Encoding is deterministic.
    /// SIMPLE is a real wire value, not the proto3 default, so field 5 is
    /// always on the wire.
    #[test]
    fn count_mode_always_encoded(record in valid_record()) {
        let bytes = encode_vote_init(&record);
        let field = [0x28, record.count_mode as u8];
        prop_assert!(bytes.windows(2).any(|w| w == field));
    }

    #[test]
    fn vote_init_encoding_deterministic(record in valid_record()) {
        prop_assert_eq!(encode_vote_init(&record), encode_vote_init(&record.clone()));
    }

    /// A strict prefix either fails to decode or is itself the complete
    /// encoding of what it decodes to: no partially populated record escapes.
    #[test]
    fn truncated_prefix_never_partial(record in valid_record(), cut in any::<prop::sample::Index>()) {
        let bytes = encode_vote_init(&record);
        let prefix = &bytes[..cut.index(bytes.len())];
        if let Ok(decoded) = decode_vote_init(prefix) {
            prop_assert_eq!(encode_vote_init(&decoded), prefix.to_vec());
        }
    }

    /// Arbitrary bytes never panic the decoders.
    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode_vote_init(&bytes);
        let _ = decode_vote_cast(&bytes);
    }

    /// Ballots roundtrip.
    #[test]
    fn vote_cast_roundtrip(id in prop::array::uniform32(0u8..), choice_index in any::<u32>()) {
        let record = VoteCastRecord { vote_init_id: TxId::new(id), choice_index };
        prop_assert_eq!(decode_vote_cast(&encode_vote_cast(&record)).unwrap(), record);
    }
}
