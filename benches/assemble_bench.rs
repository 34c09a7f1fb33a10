//! Benchmarks for binding and assembling player responses of varying size.
//!
//! Run with: `cargo bench --bench assemble_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tubeinfo::{EngineConfig, PlaybackDescriptor, PlayerResponse};

/// Generate a player response with `formats` adaptive formats and
/// `languages` translation languages.
fn generate_response(formats: usize, languages: usize) -> String {
    let adaptive: Vec<String> = (0..formats)
        .map(|i| {
            let itag = 100 + i;
            let (mime, codecs) = if i % 2 == 0 {
                ("video/mp4", "avc1.640028")
            } else {
                ("audio/webm", "opus")
            };
            format!(
                r#"{{"itag": {itag}, "url": "https://rr.example.com/videoplayback?itag={itag}", "mimeType": "{mime}; codecs=\"{codecs}\"", "bitrate": {}, "width": 1920, "height": 1080, "qualityLabel": "1080p"}}"#,
                1000 * itag
            )
        })
        .collect();

    let translations: Vec<String> = (0..languages)
        .map(|i| format!(r#"{{"languageCode": "l{i}", "languageName": {{"simpleText": "Language {i}"}}}}"#))
        .collect();

    format!(
        r#"{{
  "playabilityStatus": {{"status": "OK"}},
  "streamingData": {{"adaptiveFormats": [{}], "hlsManifestUrl": "https://manifest.example.com/hls"}},
  "captions": {{"playerCaptionsTracklistRenderer": {{
    "captionTracks": [{{"baseUrl": "https://example.com/timedtext?lang=en", "name": {{"simpleText": "English (auto-generated)"}}, "languageCode": "en", "kind": "asr"}}],
    "translationLanguages": [{}]
  }}}},
  "playbackTracking": {{"videostatsWatchtimeUrl": {{"baseUrl": "https://s.example.com/watchtime?ei=E&vm=V&of=O"}}}},
  "videoDetails": {{"videoId": "bench", "title": "Bench"}},
  "microformat": {{"playerMicroformatRenderer": {{"uploadDate": "2020-01-01"}}}},
  "playerConfig": {{"audioConfig": {{"loudnessDb": -2.0}}}}
}}"#,
        adaptive.join(","),
        translations.join(",")
    )
}

fn bench_assemble(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("assemble");

    for (formats, languages) in [(4, 10), (24, 100), (96, 200)] {
        let json = generate_response(formats, languages);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{formats}f_{languages}l")),
            &json,
            |b, json| {
                b.iter(|| {
                    let response = PlayerResponse::from_json(black_box(json)).unwrap();
                    let descriptor = PlaybackDescriptor::assemble(response, &config);
                    black_box(descriptor.captions().len());
                    black_box(descriptor.is_valid())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
