//! Streaming demo: staggered reveal of a simulated token stream.
//!
//! Feeds a markdown response to the engine a few characters at a time
//! and paints each frame to the terminal, fading characters in as
//! their reveal rectangles animate. Runs to completion and exits.

use cascade::{
    EngineConfig, MonospaceLayout, RevealConfig, RevealEngine, RevealEvent, Segmentation,
    SessionConfig, TextLayout, TokenizerConfig,
};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Sample response to stream (simulating an LLM reply).
const SAMPLE_TEXT: &str = "Staggered reveal makes streaming text feel \
deliberate instead of jittery. Each delta from the model is laid out, \
diffed against the previous wrap, and animated in as a short cascade \
of rectangles.\n\nInline markdown like **bold**, _emphasis_, and \
`code spans` is held back until its closing delimiter arrives, so the \
raw asterisks never flash on screen.\n\nWhen a long word such as \
incomprehensibilities wraps onto the next line mid-stream, the stale \
reveal is cancelled and the word fades in at its new position.\n";

const TOKEN_CHARS: usize = 4;
const TOKEN_INTERVAL: Duration = Duration::from_millis(12);

fn main() -> io::Result<()> {
    let (columns, _) = terminal::size()?;
    let width = columns.clamp(20, 72);

    let engine = RevealEngine::spawn(EngineConfig {
        max_columns: width,
        tick_interval: Duration::from_millis(16),
        session: SessionConfig {
            reveal: RevealConfig {
                segmentation: Segmentation::Word,
                ..RevealConfig::default()
            },
            tokenizer: Some(TokenizerConfig::default()),
        },
    })?;

    let chars: Vec<char> = SAMPLE_TEXT.chars().collect();
    let tokens: Vec<String> = chars
        .chunks(TOKEN_CHARS)
        .map(|chunk| chunk.iter().collect())
        .collect();

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let result = run(&engine, &chars, &tokens, width, &mut stdout);
    execute!(stdout, ResetColor, cursor::Show, LeaveAlternateScreen)?;
    engine.join();
    result
}

fn run(
    engine: &RevealEngine,
    chars: &[char],
    tokens: &[String],
    width: u16,
    stdout: &mut io::Stdout,
) -> io::Result<()> {
    // Per-character reveal progress, updated from frame snapshots.
    let mut progress = vec![0.0f32; chars.len()];
    let mut emitted = 0usize;
    let mut next_token = 0usize;
    let mut next_push = Instant::now();

    loop {
        if next_token < tokens.len() && Instant::now() >= next_push {
            engine.push_delta(tokens[next_token].clone());
            next_token += 1;
            next_push += TOKEN_INTERVAL;
            if next_token == tokens.len() {
                engine.finish();
            }
        }

        match engine.events().recv_timeout(Duration::from_millis(5)) {
            Ok(RevealEvent::Frame(rects)) => {
                for snap in &rects {
                    emitted = emitted.max(snap.end + 1);
                    for p in &mut progress[snap.start..=snap.end] {
                        *p = p.max(snap.progress);
                    }
                }
                draw(stdout, chars, &progress, emitted, width)?;
            }
            Ok(RevealEvent::Complete(len)) => {
                for p in &mut progress[..len] {
                    *p = 1.0;
                }
                draw(stdout, chars, &progress, len, width)?;
                break;
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    std::thread::sleep(Duration::from_secs(2));
    Ok(())
}

/// Paint the emitted prefix, each character faded by its progress.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw(
    stdout: &mut io::Stdout,
    chars: &[char],
    progress: &[f32],
    emitted: usize,
    width: u16,
) -> io::Result<()> {
    let prefix: String = chars[..emitted].iter().collect();
    let layout = MonospaceLayout::new(&prefix, width);

    queue!(stdout, Clear(ClearType::All))?;
    for (offset, &ch) in chars[..emitted].iter().enumerate() {
        if ch == '\n' || progress[offset] <= 0.0 {
            continue;
        }
        let Some(rect) = layout.char_box(offset) else {
            continue;
        };
        let (col, row) = (rect.left as u16, rect.top as u16);
        let level = 55 + (progress[offset] * 200.0) as u8;
        queue!(
            stdout,
            cursor::MoveTo(col, row),
            SetForegroundColor(Color::Rgb {
                r: level,
                g: level,
                b: level,
            }),
            Print(ch),
        )?;
    }
    stdout.flush()
}
