use criterion::{black_box, criterion_group, criterion_main, Criterion};
use peervote_protocol::{decode_vote_init, encode_vote_init, CountMode, VoteInitRecord};

fn sample() -> VoteInitRecord {
    VoteInitRecord {
        version: 1,
        description: "my test vote".into(),
        start_block: 361465,
        end_block: 362465,
        count_mode: CountMode::Simple,
        choices: vec!["no".into(), "yes".into(), "maybe".into()],
        vote_metainfo: b"https://imgur.com/my_pic.png".to_vec(),
    }
}

fn encode_bench(c: &mut Criterion) {
    let record = sample();

    c.bench_function("encode_vote_init", |b| {
        b.iter(|| encode_vote_init(black_box(&record)))
    });
}

fn decode_bench(c: &mut Criterion) {
    let bytes = encode_vote_init(&sample());

    c.bench_function("decode_vote_init", |b| {
        b.iter(|| decode_vote_init(black_box(&bytes)))
    });
}

criterion_group!(benches, encode_bench, decode_bench);
criterion_main!(benches);
