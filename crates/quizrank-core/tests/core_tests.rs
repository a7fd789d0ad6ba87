use std::fs;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use quizrank_core::config::{Config, SourceConfig};
use quizrank_core::quiz::{generate_round, synthesize_query};
use quizrank_core::traits::QuestionGenerator;
use quizrank_core::types::{QuestionRecord, Selection};
use quizrank_core::{rank, rank_scored, ChunkRanker, CorpusSnapshot, CorpusStore};

fn corpus(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

#[test]
fn stop_word_query_samples_evenly() {
    let out = rank(&corpus(&["a", "b", "c", "d"]), "to of the", 2).expect("rank");
    assert_eq!(out, corpus(&["a", "c"]));
}

#[test]
fn tie_goes_to_lowest_index() {
    // chunks 0 and 2 both score (2 + 3 + 2) * 2 = 14
    let c = corpus(&["Cats are mammals.", "Dogs are loyal.", "Cats and dogs are pets."]);
    let ranking = rank_scored(&c, "cats", 3).expect("rank");
    assert_eq!(ranking.selection, Selection::Relevance);
    let order: Vec<usize> = ranking.chunks.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![0, 2]);
    assert_eq!(ranking.chunks[0].score, Some(14.0));
    assert_eq!(ranking.chunks[1].score, Some(14.0));

    assert_eq!(rank(&c, "cats", 1).expect("rank"), corpus(&["Cats are mammals."]));
}

#[test]
fn no_match_falls_back_to_first_chunk() {
    let out = rank(&corpus(&["Dogs.", "Birds."]), "cats", 1).expect("rank");
    assert_eq!(out, corpus(&["Dogs."]));
}

#[test]
fn small_corpus_is_never_padded() {
    // zero-score chunks are dropped, so a partial match returns fewer than top_k
    let out = rank(&corpus(&["x", "y"]), "x", 5).expect("rank");
    assert_eq!(out, corpus(&["x"]));
    let out = rank(&corpus(&["x", "y"]), "the", 5).expect("rank");
    assert_eq!(out, corpus(&["x", "y"]));
}

#[test]
fn empty_corpus_is_empty() {
    assert!(rank::<String>(&[], "trains", 3).expect("rank").is_empty());
    assert!(rank::<String>(&[], "", 3).expect("rank").is_empty());
}

#[test]
fn coverage_multiplier_trades_off_against_repetition() {
    let c = corpus(&[
        "Intro. speed speed speed",
        "Intro. speed and distance",
        "Intro. nothing here",
    ]);
    // chunk 0: 6 * 1.5 = 9, chunk 1: 4 * 2 = 8 -> repetition still wins here
    let ranking = rank_scored(&c, "speed distance", 2).expect("rank");
    let order: Vec<usize> = ranking.chunks.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![0, 1]);

    // with one occurrence fewer, the two-keyword chunk overtakes
    let c = corpus(&["Intro. speed speed", "Intro. speed and distance"]);
    let ranking = rank_scored(&c, "speed distance", 1).expect("rank");
    assert_eq!(ranking.chunks[0].index, 1);
}

#[test]
fn duplicate_chunks_are_returned_verbatim() {
    let c = corpus(&["Ratio basics.", "Ratio basics.", "Other."]);
    let out = rank(&c, "ratio", 2).expect("rank");
    assert_eq!(out, corpus(&["Ratio basics.", "Ratio basics."]));
}

#[test]
fn ranker_struct_matches_free_function() {
    let c = corpus(&["Profit and loss.", "Time and work.", "Loss leaders."]);
    let ranker = ChunkRanker::new();
    assert_eq!(ranker.rank(&c, "loss", 2).expect("rank"), rank(&c, "loss", 2).expect("rank"));
}

#[test]
fn snapshot_lookup_by_category() {
    let snap = CorpusSnapshot::builder()
        .insert("aptitude", corpus(&["Trains cross a platform.", "Pipes fill a tank."]))
        .insert("interview", corpus(&["Tell me about yourself."]))
        .build();
    assert_eq!(snap.categories(), vec!["aptitude", "interview"]);
    assert_eq!(
        snap.relevant_chunks("aptitude", "pipes", 1).expect("rank"),
        corpus(&["Pipes fill a tank."])
    );
    assert!(snap.relevant_chunks("reasoning", "pipes", 1).expect("rank").is_empty());
    assert!(snap.relevant_chunks("reasoning", "pipes", 0).is_err());
}

#[test]
fn store_swap_leaves_held_snapshot_intact() {
    let store = Arc::new(CorpusStore::new(
        CorpusSnapshot::builder().insert("aptitude", corpus(&["old one", "old two"])).build(),
    ));
    let held = store.snapshot();

    let previous = store.replace(CorpusSnapshot::builder().insert("aptitude", corpus(&["new"])).build());
    assert!(Arc::ptr_eq(&held, &previous));
    assert_eq!(held.corpus("aptitude").len(), 2);
    assert_eq!(store.snapshot().corpus("aptitude"), &corpus(&["new"])[..]);
}

#[test]
fn concurrent_readers_see_whole_snapshots() {
    let old = corpus(&["alpha 1", "alpha 2", "alpha 3"]);
    let new = corpus(&["beta 1", "beta 2", "beta 3", "beta 4"]);
    let store = Arc::new(CorpusStore::new(CorpusSnapshot::builder().insert("c", old).build()));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    let snap = store.snapshot();
                    let chunks = snap.corpus("c");
                    let all_alpha = chunks.iter().all(|c| c.starts_with("alpha")) && chunks.len() == 3;
                    let all_beta = chunks.iter().all(|c| c.starts_with("beta")) && chunks.len() == 4;
                    assert!(all_alpha || all_beta, "mixed snapshot: {chunks:?}");
                }
            })
        })
        .collect();
    store.replace(CorpusSnapshot::builder().insert("c", new).build());
    for r in readers {
        r.join().expect("reader thread");
    }
}

struct CannedGenerator {
    count: usize,
}

impl QuestionGenerator for CannedGenerator {
    fn generate(&self, context: &str, _num_questions: usize) -> anyhow::Result<Vec<QuestionRecord>> {
        let raw = serde_json::json!({
            "question": format!("From: {context}"),
            "options": ["1", "2", "3", "4"],
            "correct_answer": 2,
            "explanation": "Ratio. Details."
        });
        let record: QuestionRecord = serde_json::from_value(raw)?;
        Ok(vec![record; self.count])
    }
}

#[test]
fn generate_round_feeds_ranked_context() {
    let snap = CorpusSnapshot::builder()
        .insert("aptitude", corpus(&["Ratio of ages.", "Trains.", "Ratio and proportion."]))
        .build();
    let generator = CannedGenerator { count: 5 };
    let questions = generate_round(&snap, "aptitude", "ratio", 2, &generator, 3).expect("round");
    assert_eq!(questions.len(), 3, "extra questions are dropped");
    assert_eq!(questions[0].question, "From: Ratio of ages. Ratio and proportion.");
}

#[test]
fn generate_round_rejects_empty_category_and_short_output() {
    let snap = CorpusSnapshot::builder().insert("aptitude", corpus(&["Ratio."])).build();
    let err = generate_round(&snap, "interview", "ratio", 3, &CannedGenerator { count: 3 }, 3).unwrap_err();
    assert!(err.to_string().contains("No content found"));

    let err = generate_round(&snap, "aptitude", "ratio", 3, &CannedGenerator { count: 1 }, 3).unwrap_err();
    assert!(err.to_string().contains("Not enough questions"));
}

#[test]
fn follow_up_query_ranks_against_recent_questions() {
    let snap = CorpusSnapshot::builder()
        .insert("aptitude", corpus(&["Intro.", "Boats and streams.", "Pipes and cisterns."]))
        .build();
    let query = synthesize_query(&["How fast is the boat in still water?"]);
    let out = snap.relevant_chunks("aptitude", &query, 1).expect("rank");
    // "boat" prefixes chunk 1; chunk 2 only matches "is" inside "cisterns"
    assert_eq!(out, corpus(&["Boats and streams."]));
}

#[test]
fn config_layers_files_and_defaults() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(
        dir.join("config.toml"),
        r#"
[ranking]
top_k = 4

[[corpus.sources]]
category = "aptitude"
path = "docs/aptitude.pdf"
"#,
    )
    .unwrap();
    fs::write(dir.join("config.test.toml"), "[chunking]\nmax_chunk_size = 500\n").unwrap();

    let config = Config::load_from(dir, "test").expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.ranking.top_k, 4);
    assert_eq!(settings.chunking.max_chunk_size, 500);
    assert_eq!(settings.chunking.overlap, 200, "default kept");
    assert_eq!(
        settings.corpus.sources,
        vec![SourceConfig { category: "aptitude".into(), path: "docs/aptitude.pdf".into() }]
    );
    assert_eq!(config.resolve_path("docs/aptitude.pdf"), dir.join("docs/aptitude.pdf"));
    assert_eq!(config.get::<usize>("ranking.top_k").expect("key"), 4);
}

#[test]
fn config_rejects_bad_values() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[ranking]\ntop_k = 0\n").unwrap();
    assert!(Config::load_from(tmp.path(), "dev").is_err());

    let tmp = TempDir::new().unwrap();
    assert!(Config::load_from(tmp.path(), "prod").is_err(), "prod needs corpus sources");
    assert!(Config::load_from(tmp.path(), "dev").is_ok());
}
