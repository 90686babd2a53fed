use criterion::{Criterion, criterion_group, criterion_main};
use scriptscribbler_engine::export::{self, ExportFormat, ExportRequest};
use scriptscribbler_engine::{Cmd, EditorSession, SessionOptions, stats};
mod common;

fn bench_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let session = EditorSession::new(common::generate_project(20, 40), SessionOptions::default());

    group.bench_function("edit_text_coalesced", |b| {
        let mut s = session.clone();
        b.iter(|| {
            let patch = s.apply(Cmd::EditText {
                index: std::hint::black_box(1),
                text: std::hint::black_box("Dust settles.".to_string()),
            });
            std::hint::black_box(patch)
        });
    });

    group.bench_function("split_then_undo", |b| {
        let mut s = session.clone();
        b.iter(|| {
            s.apply(Cmd::SplitAt {
                index: std::hint::black_box(1),
                caret: std::hint::black_box(4),
            })
            .ok();
            std::hint::black_box(s.undo().ok());
        });
    });

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    group.sample_size(10);

    let project = common::generate_project(60, 40);
    let session = EditorSession::new(project.clone(), SessionOptions::default());

    group.bench_function("project", |b| {
        b.iter(|| std::hint::black_box(export::project(std::hint::black_box(&project))));
    });

    group.bench_function("render_fountain", |b| {
        b.iter(|| {
            let request = ExportRequest {
                format: ExportFormat::Fountain,
                ..ExportRequest::default()
            };
            std::hint::black_box(session.export(request))
        });
    });

    group.bench_function("report", |b| {
        b.iter(|| std::hint::black_box(stats::report(std::hint::black_box(&project))));
    });

    group.finish();
}

criterion_group!(benches, bench_editing, bench_projection);
criterion_main!(benches);
