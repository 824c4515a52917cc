use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pi_chart::{
    generate_output, handle_connection, render, SensorSymbols, ServerConfig, StaticSymbols,
};
use std::hint::black_box;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Pi status</title></head>
<body>
<h1>Raspberry Pi <%= pi.version %></h1>
<table>
<tr><td>Memory</td><td><%= pi.memory %></td></tr>
<tr><td>Free</td><td><%= pi.memory_free %></td></tr>
<tr><td>Pin 4</td><td><%= gpio.4 %></td></tr>
</table>
<% If gpio.17 %><p class="on">Fan running</p><% Else %><p class="off">Fan stopped</p><% EndIf %>
</body>
</html>
"#;

fn static_symbols() -> StaticSymbols {
    StaticSymbols::new()
        .with_string("pi.version", "Raspberry Pi 4 Model B")
        .with_string("pi.memory", "3884")
        .with_string("pi.memory_free", "2710")
        .with_string("gpio.4", "HIGH")
        .with_boolean("gpio.17", true)
}

/// Benchmark expanding a typical status page
fn bench_status_page(c: &mut Criterion) {
    let mut symbols = static_symbols();
    let mut output = Vec::with_capacity(STATUS_PAGE.len());

    c.bench_function("status_page_expansion", |b| {
        b.iter(|| {
            generate_output(black_box(STATUS_PAGE.as_bytes()), &mut output, &mut symbols)
                .expect("Should expand template");
        })
    });
}

/// Benchmark plain documents with no directives
fn bench_plain_document(c: &mut Criterion) {
    let mut symbols = StaticSymbols::new();
    let document = "<p>No directives here, only 100% plain text.</p>\n".repeat(200);

    c.bench_function("plain_document_passthrough", |b| {
        b.iter(|| render(black_box(document.as_bytes()), &mut symbols).expect("Should render"))
    });
}

/// Benchmark nested conditional blocks at different depths
fn bench_nested_conditions(c: &mut Criterion) {
    let mut symbols = StaticSymbols::new().with_boolean("on", true);

    for depth in [1usize, 8, 32, 64].iter() {
        let mut document = "<% If on %>x".repeat(*depth);
        document.push_str(&"<% EndIf %>".repeat(*depth));

        c.bench_with_input(
            BenchmarkId::new("nested_conditions", depth),
            &document,
            |b, document| {
                b.iter(|| {
                    render(black_box(document.as_bytes()), &mut symbols).expect("Should render")
                })
            },
        );
    }
}

/// Benchmark expansion against live system symbols
fn bench_sensor_symbols(c: &mut Criterion) {
    let mut symbols = SensorSymbols::new();
    let document = "<%= pi.memory %> <%= pi.memory_free %> <%= gpio.4 %>";

    c.bench_function("sensor_symbol_expansion", |b| {
        b.iter(|| render(black_box(document.as_bytes()), &mut symbols).expect("Should render"))
    });
}

/// Benchmark a full request/response exchange for the health endpoint
fn bench_health_exchange(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let config = ServerConfig::default();
    let config = &config;

    c.bench_function("health_exchange", |b| {
        b.to_async(&rt).iter(|| async move {
            let (mut client, server) = tokio::io::duplex(4096);
            client
                .write_all(b"GET /health HTTP/1.0\r\n\r\n")
                .await
                .expect("Should send request");

            let mut symbols = StaticSymbols::new();
            handle_connection(server, config, &mut symbols)
                .await
                .expect("Should answer request");

            let mut response = Vec::new();
            client
                .read_to_end(&mut response)
                .await
                .expect("Should read response");
            response
        })
    });
}

criterion_group!(
    benches,
    bench_status_page,
    bench_plain_document,
    bench_nested_conditions,
    bench_sensor_symbols,
    bench_health_exchange
);
criterion_main!(benches);
