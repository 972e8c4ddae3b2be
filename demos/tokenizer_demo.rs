//! Tokenizer demo: watch markdown-safe chunking decisions.
//!
//! Feeds a markdown string to the tokenizer in small fragments and
//! prints, for each fragment, what was emitted and what is being held
//! back waiting for a closing delimiter.

use cascade::MarkdownTokenizer;

const SAMPLE: &str = "This is **bold text** with a `code span`, some \
_emphasis_, a ~~strikethrough~~, a lone * star, and a fence:\n\
```\nlet x = 1;\n```\ndone.\n";

fn main() {
    let mut tokenizer = MarkdownTokenizer::new();
    let fragments: Vec<String> = SAMPLE
        .chars()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect())
        .collect();

    println!("fragment        emitted                          held");
    println!("--------        -------                          ----");

    for fragment in &fragments {
        let chunks = tokenizer.push(fragment);
        let emitted: String = chunks.concat();
        let held = if tokenizer.has_pending_input() {
            format!("(waiting: {:?})", tokenizer.pending_delimiter())
        } else {
            String::new()
        };
        println!(
            "{:<15} {:<32} {}",
            display(fragment),
            display(&emitted),
            held
        );
    }

    let tail = tokenizer.finish().concat();
    if !tail.is_empty() {
        println!("{:<15} {:<32} (flushed at end of stream)", "<finish>", display(&tail));
    }
}

/// Make newlines visible in the table.
fn display(s: &str) -> String {
    s.replace('\n', "\\n")
}
