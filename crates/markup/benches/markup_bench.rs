use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use markup::{
    Config, Diagnostics, Encoding, HtmlTagTable, LexMode, Lexer, PrettyPrinter, parse,
};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let block = "<div class=box><p>hello &amp; <b>world</b></p><img src=x alt=\"\"></div>\n";
    let mut out = String::with_capacity(block.len() * blocks);
    for _ in 0..blocks {
        out.push_str(block);
    }
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri<pt");
    }
    body.push_str("</script>");
    body
}

fn make_rawtext_long_body(words: usize) -> String {
    format!("<script>{}</script>", "a ".repeat(words))
}

fn lex_all(input: &[u8], config: &Config, tags: &HtmlTagTable) -> usize {
    let mut diag = Diagnostics::new(0);
    let mut lexer = Lexer::new(input.to_vec(), config, tags);
    let mut count = 0;
    while lexer.next_token(LexMode::MixedContent, &mut diag).is_some() {
        count += 1;
    }
    count
}

fn bench_lex_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    let config = Config::default();
    let tags = HtmlTagTable::new();
    c.bench_function("bench_lex_small", |b| {
        b.iter(|| black_box(lex_all(black_box(input.as_bytes()), &config, &tags)));
    });
}

fn bench_lex_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let config = Config::default();
    let tags = HtmlTagTable::new();
    c.bench_function("bench_lex_large", |b| {
        b.iter(|| black_box(lex_all(black_box(input.as_bytes()), &config, &tags)));
    });
}

fn bench_lex_latin1(c: &mut Criterion) {
    let input: Vec<u8> = make_blocks(LARGE_BLOCKS)
        .replace("hello", "h\u{e9}llo")
        .chars()
        .map(|c| c as u8)
        .collect();
    let config = Config {
        input_encoding: Encoding::Latin1,
        ..Config::default()
    };
    let tags = HtmlTagTable::new();
    c.bench_function("bench_lex_latin1", |b| {
        b.iter(|| black_box(lex_all(black_box(&input), &config, &tags)));
    });
}

fn bench_raw_text_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(1 << 20);
    let config = Config::default();
    let tags = HtmlTagTable::new();
    c.bench_function("bench_raw_text_adversarial", |b| {
        b.iter_batched(
            || input.as_bytes().to_vec(),
            |bytes| {
                let mut diag = Diagnostics::new(0);
                black_box(parse(bytes, &config, &tags, &mut diag));
            },
            BatchSize::LargeInput,
        );
    });
}

/// Per-byte time should stay flat as the script body grows.
fn bench_raw_text_scaling(c: &mut Criterion) {
    let config = Config::default();
    let tags = HtmlTagTable::new();
    let mut group = c.benchmark_group("bench_raw_text_scaling");
    for words in [20_000usize, 40_000, 80_000] {
        let input = make_rawtext_long_body(words);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(words), &input, |b, input| {
            b.iter_batched(
                || input.as_bytes().to_vec(),
                |bytes| {
                    let mut diag = Diagnostics::new(0);
                    black_box(parse(bytes, &config, &tags, &mut diag));
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_print_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let config = Config::default();
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::new(0);
    let doc = parse(input.into_bytes(), &config, &tags, &mut diag);
    let printer = PrettyPrinter::new(&config, &tags);
    c.bench_function("bench_print_large", |b| {
        b.iter(|| black_box(printer.print(black_box(&doc)).len()));
    });
}

criterion_group!(
    benches,
    bench_lex_small,
    bench_lex_large,
    bench_lex_latin1,
    bench_raw_text_adversarial,
    bench_raw_text_scaling,
    bench_print_large
);
criterion_main!(benches);
