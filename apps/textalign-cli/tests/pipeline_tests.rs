use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use textalign_cli::args::AlignArgs;
use textalign_cli::pipeline::{output_file_name, run_transcript_file};
use textalign_core::config::AlignSettings;
use textalign_core::corpus::{list_transcript_files, BookDirectory};
use textalign_core::error::Error;
use textalign_core::traits::ReferenceStore;
use textalign_core::types::{Granularity, ReferenceText};
use textalign_engine::{AlignmentEngine, EngineOptions};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn word_engine(sequenced: bool) -> AlignmentEngine {
    AlignmentEngine::new(EngineOptions { granularity: Granularity::Word, workers: 3, sequenced, ..EngineOptions::default() })
}

struct MemoryStore(HashMap<String, String>);

impl ReferenceStore for MemoryStore {
    fn load(&self, key: &str) -> anyhow::Result<ReferenceText> {
        let text = self.0.get(key).ok_or_else(|| Error::NotFound(key.to_string()))?;
        Ok(ReferenceText::new(key, text.clone()))
    }
}

#[test]
fn batch_writes_one_row_per_fragment() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("books/portuguese/100.txt"), "Era uma vez\num gato preto\nque vivia numa casa amarela.\n");
    write(&tmp.path().join("books/portuguese/200.txt"), "O mar estava calmo naquela manha de sol.");
    let transcript = tmp.path().join("transcripts/dev.txt");
    write(
        &transcript,
        "7_200_000001\tmar estava calmo\n7_100_000002\tque vivia numa casa\n7_100_000001\tum gato preto\n",
    );

    let books = BookDirectory::new(tmp.path().join("books"), "pt").unwrap();
    let output = tmp.path().join(output_file_name("portuguese", &tmp.path().join("transcripts"), &transcript));
    let summary = run_transcript_file(&word_engine(true), &books, &transcript, &output, false).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.aligned, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.mean_similarity, 1.0);
    assert!(output.ends_with("output_portuguese_dev.csv"));

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        [
            "7_100_000001|um gato preto|um gato preto|1.0",
            "7_100_000002|que vivia numa casa|que vivia numa casa|1.0",
            "7_200_000001|mar estava calmo|mar estava calmo|1.0",
        ]
    );
}

#[test]
fn missing_documents_are_skipped_and_unmatched_rows_recorded() {
    let tmp = TempDir::new().unwrap();
    let transcript = tmp.path().join("test.tsv");
    write(
        &transcript,
        "1_a_1\tthe lazy dog\n1_a_2\tthis query is far longer than the whole book text\n1_missing_1\tanything\nbadid\tno key\n",
    );
    let store = MemoryStore(HashMap::from([("a".to_string(), "over the lazy dog".to_string())]));
    let output = tmp.path().join("out.csv");

    let summary = run_transcript_file(&word_engine(false), &store, &transcript, &output, false).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.aligned, 1);
    assert_eq!(summary.skipped, 2);
    assert!((summary.mean_similarity - 0.5).abs() < 1e-12);

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "1_a_1|the lazy dog|the lazy dog|1.0");
    assert_eq!(lines[1], "1_a_2|this query is far longer than the whole book text||0.0");
}

#[test]
fn output_names_follow_transcript_location() {
    let root = Path::new("/data/mls_polish_opus");
    assert_eq!(output_file_name("polish", root, &root.join("dev/transcripts.txt")), "output_polish_dev.csv");
    assert_eq!(output_file_name("polish", root, &root.join("train.txt")), "output_polish_train.csv");
    assert_eq!(output_file_name("polish", root, &root.join("extra/test.tsv")), "output_polish_extra_test.csv");
    assert_eq!(output_file_name("polish", root, &root.join("transcripts.txt")), "output_polish_transcripts.csv");
    assert_eq!(output_file_name("polish", root, Path::new("/elsewhere/pl/train.txt")), "output_polish_train.csv");
    assert_eq!(output_file_name("polish", root, Path::new("/elsewhere/test/transcripts.txt")), "output_polish_test.csv");
}

#[test]
fn each_split_gets_its_own_complete_output() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("books/portuguese/100.txt"), "Era uma vez um gato preto que vivia numa casa amarela.");
    let root = tmp.path().join("mls_portuguese_opus");
    write(&root.join("dev/transcripts.txt"), "1_100_1\tum gato preto\n");
    write(&root.join("dev/segments.txt"), "1_100_1\thttp://example.org/1.flac\t0.1\t2.0\n");
    write(&root.join("train/transcripts.txt"), "2_100_1\tera uma vez\n2_100_2\tnuma casa amarela.\n");
    write(&root.join("train/segments.txt"), "2_100_1\thttp://example.org/2.flac\t0.1\t2.0\n");

    let books = BookDirectory::new(tmp.path().join("books"), "pt").unwrap();
    let out_dir = tmp.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    for transcript in list_transcript_files(&root) {
        let output = out_dir.join(output_file_name("portuguese", &root, &transcript));
        run_transcript_file(&word_engine(true), &books, &transcript, &output, false).unwrap();
    }

    let mut names: Vec<String> = fs::read_dir(&out_dir).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
    names.sort();
    assert_eq!(names, ["output_portuguese_dev.csv", "output_portuguese_train.csv"]);

    let dev = fs::read_to_string(out_dir.join("output_portuguese_dev.csv")).unwrap();
    assert_eq!(dev.lines().collect::<Vec<_>>(), ["1_100_1|um gato preto|um gato preto|1.0"]);
    let train = fs::read_to_string(out_dir.join("output_portuguese_train.csv")).unwrap();
    assert_eq!(train.lines().count(), 2);
    assert!(train.starts_with("2_100_1|era uma vez|Era uma vez|"));
    assert!(train.contains("2_100_2|numa casa amarela.|numa casa amarela.|1.0"));
}

#[test]
fn cli_args_override_settings() {
    let mut settings = AlignSettings::default();
    let args = AlignArgs { metric: Some("levenshtein".into()), granularity: None, workers: Some(8), sequenced: true, timeout_ms: Some(50) };
    args.apply(&mut settings);
    assert_eq!(settings.metric, "levenshtein");
    assert_eq!(settings.granularity, "word");
    assert_eq!(settings.workers, 8);
    assert!(settings.sequenced);
    assert_eq!(settings.scan_timeout_ms, Some(50));
}
