use crate::block::Block;
use crate::classify::{LineKind, classify};

/// Parses report markdown into an ordered block sequence.
///
/// Lines are split on `\n`, so a trailing newline yields a final [`Block::Blank`].
/// The empty string yields no blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    if markdown.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = markdown.split('\n').map(str::trim_end).collect();
    let mut blocks = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        match classify(line) {
            LineKind::Blank => {
                blocks.push(Block::Blank);
                i += 1;
            }
            LineKind::Heading { level, text } => {
                blocks.push(Block::heading(level, text));
                i += 1;
            }
            LineKind::Bullet { .. } => {
                let mut items = Vec::new();
                // Continuation lines are matched after left-trimming; anything else ends the run.
                while let Some(LineKind::Bullet { item }) =
                    lines.get(i).map(|l| classify(l.trim_start()))
                {
                    items.push(item.to_string());
                    i += 1;
                }
                blocks.push(Block::BulletList { items });
            }
            LineKind::Text => {
                blocks.push(Block::paragraph(line));
                i += 1;
            }
        }
    }

    log::debug!("Parsed {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}
