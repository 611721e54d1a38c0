use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lac_core::{
    decode, decode_batch, parse_labels, LabelTable, Lac, OffsetTable, RankMerger, Resources,
    TagPredictor, Tokenizer, Vocabulary,
};

/// Tags every character as a single-character noun.
struct SinglePredictor;

impl TagPredictor for SinglePredictor {
    fn predict(&mut self, input_ids: &[i64], _offsets: &OffsetTable) -> lac_core::Result<Vec<i64>> {
        Ok(vec![0; input_ids.len()])
    }

    fn fork(&self) -> lac_core::Result<Box<dyn TagPredictor>> {
        Ok(Box::new(SinglePredictor))
    }
}

fn bench_decode(c: &mut Criterion) {
    let query = "百度是一家高科技公司";
    let tokens = Tokenizer::new().tokenize(query);
    let labels = parse_labels(
        &["ORG-B", "ORG-I", "v-B", "m-B", "q-B", "n-B", "n-I", "n-I", "n-B", "n-I"],
        0,
    )
    .unwrap();

    c.bench_function("decode_single", |b| {
        b.iter(|| decode(black_box(&tokens), black_box(&labels)).unwrap());
    });

    let batch = 32;
    let flat_tokens: Vec<_> = (0..batch).flat_map(|_| tokens.iter().cloned()).collect();
    let flat_labels: Vec<_> = (0..batch).flat_map(|_| labels.iter().cloned()).collect();
    let offsets = OffsetTable::build(std::iter::repeat(tokens.len()).take(batch));

    c.bench_function("decode_batch_32", |b| {
        b.iter(|| decode_batch(black_box(&flat_tokens), black_box(&flat_labels), &offsets).unwrap());
    });

    let scores: Vec<u32> = (0..labels.len() as u32).map(|i| i % 4).collect();
    let merger = RankMerger::default();
    c.bench_function("merge_scores", |b| {
        b.iter(|| merger.merge_scores(black_box(&labels), black_box(&scores)).unwrap());
    });
}

fn bench_engine(c: &mut Criterion) {
    let words: HashMap<String, i64> = "百度是一家高科技公司"
        .chars()
        .chain(['O'])
        .enumerate()
        .map(|(i, ch)| (ch.to_string(), i as i64))
        .collect();
    let vocab = Vocabulary::new(words, HashMap::new(), "O");
    let labels = LabelTable::from_entries([(0, "n-B")]);
    let resources = Arc::new(Resources::new(vocab, labels));
    let mut lac = Lac::new(resources, Box::new(SinglePredictor));

    let queries = vec!["百度是一家高科技公司"; 16];
    c.bench_function("engine_run_batch_16", |b| {
        b.iter(|| lac.run_batch(black_box(&queries)).unwrap());
    });
}

criterion_group!(benches, bench_decode, bench_engine);
criterion_main!(benches);
