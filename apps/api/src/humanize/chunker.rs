/// Splits text into consecutive word-range chunks of at most `max_words` words.
///
/// Whitespace is normalized: each chunk is its words joined by single spaces, so
/// `chunks.join(" ")` equals the input's words joined by single spaces.
/// Empty input yields no chunks. A `max_words` of 0 is treated as 1.
pub fn split_into_chunks(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}
