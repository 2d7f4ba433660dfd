/*!
 * Tests for token-bounded chunking through the public API
 */

use doctrans::tokenizer::{TiktokenCounter, TokenCounter, WhitespaceTokenCounter};
use doctrans::translation::chunker::{join_lines, ChunkBoundaries};
use doctrans::translation::{chunk_lines, CHUNK_SEPARATOR};

fn words(count: usize, tag: &str) -> String {
    vec![tag; count].join(" ")
}

#[test]
fn test_chunkLines_withWhitespaceCounter_shouldGroupWithinBudget() {
    // ", " is one whitespace-separated token, so a pair costs 3 + 1 + 3
    let lines = vec![words(3, "a"), words(3, "b"), words(3, "c"), words(2, "d")];

    let chunks: Vec<String> = chunk_lines(&lines, 7, &WhitespaceTokenCounter).collect();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], format!("{}{}{}", lines[0], CHUNK_SEPARATOR, lines[1]));
    assert_eq!(chunks[1], format!("{}{}{}", lines[2], CHUNK_SEPARATOR, lines[3]));
}

#[test]
fn test_chunkLines_everyChunkShouldRespectBound() {
    let lines: Vec<String> = (1..60).map(|i| words(i % 13 + 1, "w")).collect();
    let max = 20;

    for chunk in chunk_lines(&lines, max, &WhitespaceTokenCounter) {
        let total = WhitespaceTokenCounter.count_tokens(&chunk);
        assert!(total <= max, "chunk {:?} has {} tokens", chunk, total);
    }
}

#[test]
fn test_chunkLines_joinedTextShouldStayWithinBpeBudget() {
    let counter = TiktokenCounter::for_model("gpt-3.5-turbo").unwrap();
    let lines: Vec<String> = (0..200).map(|i| format!("word{}", i)).collect();
    let max = 50;

    let chunks: Vec<String> = chunk_lines(&lines, max, &counter).collect();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        let total = counter.count_tokens(chunk);
        assert!(total <= max, "chunk {:?} has {} tokens", chunk, total);
    }
}

#[test]
fn test_chunkLines_examLinesShouldStayWithinBpeBudget() {
    let counter = TiktokenCounter::for_model("gpt-3.5-turbo").unwrap();
    let lines: Vec<String> = (0..60)
        .map(|i| match i % 4 {
            0 => format!("{}. Which of the following statements is correct?", i / 4 + 1),
            1 => "a) The sun rises in the west".to_string(),
            2 => "b) Water boils at 100 degrees Celsius at sea level".to_string(),
            _ => String::new(),
        })
        .collect();

    for max in [20, 64, 200] {
        for chunk in chunk_lines(&lines, max, &counter) {
            let total = counter.count_tokens(&chunk);
            assert!(total <= max, "chunk {:?} has {} tokens (max {})", chunk, total, max);
        }
    }
}

#[test]
fn test_chunkLines_singleLineAboveLimit_shouldStandAlone() {
    let lines = vec!["short".to_string(), words(50, "long"), "tail".to_string()];

    let chunks: Vec<String> = chunk_lines(&lines, 10, &WhitespaceTokenCounter).collect();

    assert_eq!(chunks, vec!["short".to_string(), lines[1].clone(), "tail".to_string()]);
}

#[test]
fn test_chunkLines_shouldPreserveEveryLineInOrder() {
    let lines: Vec<String> = (0..25).map(|i| format!("line {} of the document", i)).collect();

    let ranges: Vec<_> = ChunkBoundaries::new(&lines, 12, &WhitespaceTokenCounter).collect();
    let rebuilt: Vec<String> = ranges
        .iter()
        .map(|range| join_lines(&lines[range.clone()]))
        .collect();
    let chunked: Vec<String> = chunk_lines(&lines, 12, &WhitespaceTokenCounter).collect();

    assert_eq!(rebuilt, chunked);
    assert_eq!(ranges.first().map(|r| r.start), Some(0));
    assert_eq!(ranges.last().map(|r| r.end), Some(lines.len()));
}

#[test]
fn test_chunkLines_emptyLines_shouldStillBeCarried() {
    let lines = vec!["".to_string(), "".to_string(), "x".to_string()];

    let chunks: Vec<String> = chunk_lines(&lines, 500, &WhitespaceTokenCounter).collect();

    assert_eq!(chunks, vec![", , x".to_string()]);
}

#[test]
fn test_chunkLines_strSlices_shouldWork() {
    let lines = ["alpha", "beta"];
    let chunks: Vec<String> = chunk_lines(&lines, 500, &|text: &str| text.len()).collect();
    assert_eq!(chunks, vec!["alpha, beta".to_string()]);
}
