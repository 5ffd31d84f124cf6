use criterion::{Criterion, black_box, criterion_group, criterion_main};

use glint_core::document::ModelDocument;
use glint_core::fingerprint::shader_fingerprint;
use glint_core::glsl::{ElementKind, GlslType};
use glint_core::uniform::UniformValue;

fn model_text(meshes: usize) -> String {
    let mesh = r#"{"name":"m","material":"red","buffers":{"vertex":[0,0,0,1,0,0,0,1,0],"index":[0,1,2]}}"#;
    let meshes = vec![mesh; meshes].join(",");
    format!(
        r#"{{"name":"bench","materials":[{{"name":"red","shader":{{"name":"basic","defines":["LIT"]}},"properties":{{"u_color":[1,0,0,1]}}}}],"meshes":[{meshes}]}}"#
    )
}

// ---------------------------------------------------------------------------
// Model documents
// ---------------------------------------------------------------------------

fn bench_parse_small(c: &mut Criterion) {
    let text = model_text(1);
    c.bench_function("model_document_parse_1_mesh", |b| {
        b.iter(|| ModelDocument::parse(black_box(&text)));
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let text = model_text(256);
    c.bench_function("model_document_parse_256_meshes", |b| {
        b.iter(|| ModelDocument::parse(black_box(&text)));
    });
}

// ---------------------------------------------------------------------------
// Type table and uniform conversion
// ---------------------------------------------------------------------------

fn bench_type_lookup(c: &mut Criterion) {
    let codes: Vec<u32> = GlslType::ALL.iter().map(|ty| ty.code()).collect();
    c.bench_function("glsl_type_from_code_all", |b| {
        b.iter(|| {
            for &code in &codes {
                black_box(GlslType::from_code(black_box(code)));
            }
        });
    });
}

fn bench_convert_mat4(c: &mut Criterion) {
    let value = UniformValue::FloatArray(vec![0.5; 16]);
    c.bench_function("uniform_convert_mat4", |b| {
        b.iter(|| black_box(&value).convert(ElementKind::Float, 16));
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let defines: Vec<String> = (0..8).map(|i| format!("FEATURE_{i}")).collect();
    c.bench_function("shader_fingerprint_8_defines", |b| {
        b.iter(|| shader_fingerprint(black_box("basic"), black_box(&defines)));
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large,
    bench_type_lookup,
    bench_convert_mat4,
    bench_fingerprint,
);
criterion_main!(benches);
