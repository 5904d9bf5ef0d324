//! Benchmarks comparing wikimark rendering vs pulldown-cmark (Markdown)
//!
//! Run with: cargo bench -p wikimark-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pulldown_cmark::{html, Options, Parser as MdParser};
use wikimark_core::{Format, Markdown, PluginKind};

/// Sample wiki page using every plugin
const WIKI_SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, `inline code`
and a ==highlight==. It cites a source[^src] twice[^src].

## Checklist

- [x] Write the parser
- [x] Add footnotes
- [ ] Ship the release

1. Step one of the process
2. Step two continues
3. Step three completes

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

## Callouts

::: info
# Performance
Rendering is a single pass over rule tables.
No per-document setup is shared between threads.
:::

>! The butler did it.

>| # More details
>| Folded text stays hidden until expanded.

## Formulas

Inline $e^{i\pi} + 1 = 0$ and a block:

$$
\int_0^1 x^2 \, dx = \frac{1}{3}
$$

> The best code is no code at all.
> Every line of code you write is a liability.

---

End of document.

[^src]: The cited reference,
    continued on a second line.
"#;

/// Equivalent Markdown content (as close as possible)
const MARKDOWN_SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, `inline code`
and a ==highlight==. It cites a source[^src] twice[^src].

## Checklist

- [x] Write the parser
- [x] Add footnotes
- [ ] Ship the release

1. Step one of the process
2. Step two continues
3. Step three completes

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

## Callouts

> **Performance**
>
> Rendering is a single pass over rule tables.
> No per-document setup is shared between threads.

> The butler did it.

> **More details**
> Folded text stays hidden until expanded.

## Formulas

Inline $e^{i\pi} + 1 = 0$ and a block:

$$
\int_0^1 x^2 \, dx = \frac{1}{3}
$$

> The best code is no code at all.
> Every line of code you write is a liability.

---

End of document.

[^src]: The cited reference,
    continued on a second line.
"#;

fn engine() -> Markdown {
    Markdown::with_plugins(Format::Html, &PluginKind::ALL).unwrap()
}

fn pulldown_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, MdParser::new_ext(text, Options::all()));
    out
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let md = engine();

    group.throughput(Throughput::Bytes(WIKI_SAMPLE.len() as u64));

    group.bench_function("wikimark", |b| {
        b.iter(|| {
            let html = md.render(black_box(WIKI_SAMPLE)).unwrap().into_string();
            black_box(html.len())
        })
    });

    group.throughput(Throughput::Bytes(MARKDOWN_SAMPLE.len() as u64));

    group.bench_function("markdown_pulldown", |b| {
        b.iter(|| black_box(pulldown_html(black_box(MARKDOWN_SAMPLE)).len()))
    });

    group.finish();
}

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");
    let html_md = engine();
    let ast_md = Markdown::with_plugins(Format::Ast, &PluginKind::ALL).unwrap();

    group.throughput(Throughput::Bytes(WIKI_SAMPLE.len() as u64));

    group.bench_function("parse_only", |b| {
        b.iter(|| {
            let mut state = html_md.new_state();
            let blocks = html_md.parse(black_box(WIKI_SAMPLE), &mut state).unwrap();
            black_box(blocks.len())
        })
    });

    group.bench_function("html", |b| {
        b.iter(|| black_box(html_md.render(black_box(WIKI_SAMPLE)).unwrap()))
    });

    group.bench_function("ast", |b| {
        b.iter(|| black_box(ast_md.render(black_box(WIKI_SAMPLE)).unwrap()))
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let md = engine();

    for size in [1, 5, 10, 20].iter() {
        let wiki_content: String = WIKI_SAMPLE.repeat(*size);
        let markdown_content: String = MARKDOWN_SAMPLE.repeat(*size);

        group.throughput(Throughput::Bytes(wiki_content.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("wikimark", size),
            &wiki_content,
            |b, content| {
                b.iter(|| {
                    let html = md.render(black_box(content)).unwrap().into_string();
                    black_box(html.len())
                })
            },
        );

        group.throughput(Throughput::Bytes(markdown_content.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("markdown", size),
            &markdown_content,
            |b, content| b.iter(|| black_box(pulldown_html(black_box(content)).len())),
        );
    }

    group.finish();
}

fn bench_plugins(c: &mut Criterion) {
    let mut group = c.benchmark_group("plugins");
    let bare = Markdown::new(Format::Html).unwrap();
    let full = engine();

    group.bench_function("no_plugins", |b| {
        b.iter(|| black_box(bare.render(black_box(WIKI_SAMPLE)).unwrap()))
    });

    group.bench_function("all_plugins", |b| {
        b.iter(|| black_box(full.render(black_box(WIKI_SAMPLE)).unwrap()))
    });

    group.finish();
}

fn bench_inline_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");
    let md = engine();

    let wiki_inline =
        "This has *emphasis*, **strong**, `code`, [link](https://example.com), ==mark== and $x^2$.";
    let markdown_inline =
        "This has *emphasis*, **strong**, `code`, [link](https://example.com), ~~strike~~ and $x^2$.";

    group.bench_function("wikimark_inline", |b| {
        b.iter(|| {
            let mut state = md.new_state();
            black_box(md.render_inline(black_box(wiki_inline), &mut state).unwrap())
        })
    });

    group.bench_function("markdown_inline", |b| {
        b.iter(|| black_box(pulldown_html(black_box(markdown_inline)).len()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_formats,
    bench_scaling,
    bench_plugins,
    bench_inline_parsing
);
criterion_main!(benches);
